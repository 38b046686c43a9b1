//! Day counting and per-day pricing.
//!
//! All counts are calendar days actually elapsed. Nothing here uses a 360 or
//! 365 day convention: a yearly period spanning Feb 29 has 366 days.

use crate::error::PeriodError;
use crate::services::{AnchorStrategy, IntervalPolicy};
use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Day-count and proration utilities.
#[derive(Debug, Clone)]
pub struct ProrationHelper;

impl ProrationHelper {
    pub fn is_leap_year(year: i32) -> bool {
        NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|date| date.leap_year())
    }

    pub fn days_in_year(year: i32) -> i64 {
        if Self::is_leap_year(year) {
            366
        } else {
            365
        }
    }

    /// Length of `month` (1-12) in `year`, `None` for an invalid month.
    pub fn days_in_month(year: i32, month: u32) -> Option<i64> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = first.checked_add_months(Months::new(1))?;
        Some((next - first).num_days())
    }

    /// Number of days from `from` to `to`, both included.
    pub fn inclusive_day_span(from: NaiveDate, to: NaiveDate) -> Result<i64, PeriodError> {
        if to < from {
            return Err(PeriodError::InvalidSpan { from, to });
        }
        Ok((to - from).num_days() + 1)
    }

    /// Length of the full interval containing `date`.
    ///
    /// Termination and start clamping never shorten this: it is the nominal
    /// period used as the pricing denominator.
    pub fn period_day_count(
        policy: &dyn IntervalPolicy,
        strategy: &dyn AnchorStrategy,
        anchor_date: NaiveDate,
        date: NaiveDate,
    ) -> Result<i64, PeriodError> {
        let start = strategy.period_start(policy, date, anchor_date)?;
        let end = strategy.period_end(policy, date, anchor_date)?;
        Self::inclusive_day_span(start, end)
    }

    /// Price of a single day: `amount / day_count`, unrounded.
    pub fn single_day_price(amount: Decimal, day_count: i64) -> Result<Decimal, PeriodError> {
        if day_count <= 0 {
            return Err(PeriodError::ZeroLengthPeriod);
        }
        amount
            .checked_div(Decimal::from(day_count))
            .ok_or(PeriodError::AmountOverflow)
    }

    /// Share of `amount` for `days_billed` out of `day_count`, rounded half-even
    /// to `scale` decimal places.
    ///
    /// Multiplies before dividing so a full period returns `amount` exactly.
    pub fn prorate(
        amount: Decimal,
        day_count: i64,
        days_billed: i64,
        scale: u32,
    ) -> Result<Decimal, PeriodError> {
        if day_count <= 0 {
            return Err(PeriodError::ZeroLengthPeriod);
        }
        let prorated = amount
            .checked_mul(Decimal::from(days_billed))
            .and_then(|total| total.checked_div(Decimal::from(day_count)))
            .ok_or(PeriodError::AmountOverflow)?;
        Ok(prorated.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingInterval, BillingTime};
    use crate::services::{anchor_strategy, interval_policy};
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leap_years() {
        assert!(ProrationHelper::is_leap_year(2020));
        assert!(ProrationHelper::is_leap_year(2000));
        assert!(!ProrationHelper::is_leap_year(1900));
        assert!(!ProrationHelper::is_leap_year(2022));
        assert_eq!(ProrationHelper::days_in_year(2024), 366);
        assert_eq!(ProrationHelper::days_in_year(2100), 365);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(ProrationHelper::days_in_month(2022, 2), Some(28));
        assert_eq!(ProrationHelper::days_in_month(2024, 2), Some(29));
        assert_eq!(ProrationHelper::days_in_month(2022, 4), Some(30));
        assert_eq!(ProrationHelper::days_in_month(2022, 12), Some(31));
        assert_eq!(ProrationHelper::days_in_month(2022, 13), None);
    }

    #[test]
    fn test_inclusive_day_span() {
        assert_eq!(
            ProrationHelper::inclusive_day_span(date(2022, 1, 1), date(2022, 1, 1)).unwrap(),
            1
        );
        assert_eq!(
            ProrationHelper::inclusive_day_span(date(2024, 2, 1), date(2024, 3, 1)).unwrap(),
            30
        );
        assert_eq!(
            ProrationHelper::inclusive_day_span(date(2022, 3, 1), date(2022, 2, 1)),
            Err(PeriodError::InvalidSpan {
                from: date(2022, 3, 1),
                to: date(2022, 2, 1)
            })
        );
    }

    #[test]
    fn test_period_day_count_yearly() {
        let policy = interval_policy(BillingInterval::Yearly);
        let calendar = anchor_strategy(BillingTime::Calendar);
        let anniversary = anchor_strategy(BillingTime::Anniversary);
        let anchor = date(2020, 2, 2);

        assert_eq!(
            ProrationHelper::period_day_count(policy, calendar, anchor, date(2020, 6, 1)).unwrap(),
            366
        );
        assert_eq!(
            ProrationHelper::period_day_count(policy, calendar, anchor, date(2021, 6, 1)).unwrap(),
            365
        );
        // 2023-02-02 .. 2024-02-01 does not contain Feb 29.
        assert_eq!(
            ProrationHelper::period_day_count(policy, anniversary, anchor, date(2023, 6, 1))
                .unwrap(),
            365
        );
        // 2023-06-01 anchor: the 2023-06-01 .. 2024-05-31 period contains 2024-02-29.
        assert_eq!(
            ProrationHelper::period_day_count(
                policy,
                anniversary,
                date(2023, 6, 1),
                date(2023, 7, 1)
            )
            .unwrap(),
            366
        );
    }

    #[test]
    fn test_single_day_price() {
        let price = ProrationHelper::single_day_price(Decimal::from(36500), 365).unwrap();
        assert_eq!(price, Decimal::from(100));
        assert_eq!(
            ProrationHelper::single_day_price(Decimal::from(100), 0),
            Err(PeriodError::ZeroLengthPeriod)
        );
    }

    #[test]
    fn test_single_day_price_reconstructs_amount() {
        let amount = Decimal::from(10_000);
        let price = ProrationHelper::single_day_price(amount, 366).unwrap();
        let rebuilt = price * Decimal::from(366);
        assert!((rebuilt - amount).abs() < Decimal::ONE);
    }

    #[test]
    fn test_prorate_full_and_partial() {
        let amount = Decimal::from(10_000);
        assert_eq!(
            ProrationHelper::prorate(amount, 365, 365, 0).unwrap(),
            amount
        );
        // 10000 * 31 / 365 = 849.315...
        assert_eq!(
            ProrationHelper::prorate(amount, 365, 31, 0).unwrap(),
            Decimal::from(849)
        );
        assert_eq!(
            ProrationHelper::prorate(amount, 365, 31, 2).unwrap(),
            Decimal::from_str("849.32").unwrap()
        );
    }

    #[test]
    fn test_prorate_rounds_half_to_even() {
        // 5 * 1 / 2 = 2.5 -> 2
        assert_eq!(
            ProrationHelper::prorate(Decimal::from(5), 2, 1, 0).unwrap(),
            Decimal::from(2)
        );
        // 7 * 1 / 2 = 3.5 -> 4
        assert_eq!(
            ProrationHelper::prorate(Decimal::from(7), 2, 1, 0).unwrap(),
            Decimal::from(4)
        );
    }
}
