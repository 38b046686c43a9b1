//! Period alignment for calendar and anniversary billing.

use crate::error::PeriodError;
use crate::models::BillingTime;
use crate::services::IntervalPolicy;
use chrono::NaiveDate;
use std::fmt;

/// Aligns a cadence to either fixed calendar units or the subscription anchor.
///
/// Implementors only decide which date the cadence is anchored on; the
/// provided methods derive period bounds from that anchor through the
/// [`IntervalPolicy`].
pub trait AnchorStrategy: fmt::Debug + Send + Sync {
    fn billing_time(&self) -> BillingTime;

    /// Date the cadence's boundaries are computed from.
    fn align(
        &self,
        policy: &dyn IntervalPolicy,
        anchor_date: NaiveDate,
    ) -> Result<NaiveDate, PeriodError>;

    /// First day of the period containing `reference_date`.
    fn period_start(
        &self,
        policy: &dyn IntervalPolicy,
        reference_date: NaiveDate,
        anchor_date: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        let anchor = self.align(policy, anchor_date)?;
        policy.boundary_on_or_before(reference_date, anchor)
    }

    /// Last day of the period containing `reference_date`.
    fn period_end(
        &self,
        policy: &dyn IntervalPolicy,
        reference_date: NaiveDate,
        anchor_date: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        let anchor = self.align(policy, anchor_date)?;
        let start = policy.boundary_on_or_before(reference_date, anchor)?;
        let next_start = policy.add_interval(start, anchor)?;
        next_start.pred_opt().ok_or(PeriodError::DateOutOfRange)
    }

    /// End of the period containing `from_after`; returns `from_after` itself
    /// when it already is a period end.
    fn next_period_end(
        &self,
        policy: &dyn IntervalPolicy,
        from_after: NaiveDate,
        anchor_date: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        self.period_end(policy, from_after, anchor_date)
    }

    /// Start of the period before the one containing `reference_date`, or of
    /// that period itself when `current_period` is set.
    fn previous_period_start(
        &self,
        policy: &dyn IntervalPolicy,
        reference_date: NaiveDate,
        anchor_date: NaiveDate,
        current_period: bool,
    ) -> Result<NaiveDate, PeriodError> {
        let anchor = self.align(policy, anchor_date)?;
        let current = policy.boundary_on_or_before(reference_date, anchor)?;
        if current_period {
            return Ok(current);
        }
        policy.subtract_interval(current, anchor)
    }
}

/// Strategy for a billing time.
pub fn anchor_strategy(billing_time: BillingTime) -> &'static dyn AnchorStrategy {
    match billing_time {
        BillingTime::Calendar => &CalendarStrategy,
        BillingTime::Anniversary => &AnniversaryStrategy,
    }
}

/// Periods start on calendar unit boundaries; only the anchor's year, quarter,
/// month or week matters, never its day.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarStrategy;

/// Periods start on the anchor's own day. Anchor days missing from a month
/// (Feb 29, day 31) resolve to that month's last day.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnniversaryStrategy;

impl AnchorStrategy for CalendarStrategy {
    fn billing_time(&self) -> BillingTime {
        BillingTime::Calendar
    }

    fn align(
        &self,
        policy: &dyn IntervalPolicy,
        anchor_date: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        policy.calendar_start(anchor_date)
    }
}

impl AnchorStrategy for AnniversaryStrategy {
    fn billing_time(&self) -> BillingTime {
        BillingTime::Anniversary
    }

    fn align(
        &self,
        _policy: &dyn IntervalPolicy,
        anchor_date: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        Ok(anchor_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingInterval;
    use crate::services::interval_policy;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_yearly_ignores_anchor_day() {
        let policy = interval_policy(BillingInterval::Yearly);
        let strategy = anchor_strategy(BillingTime::Calendar);
        let anchor = date(2020, 2, 2);

        assert_eq!(
            strategy
                .period_start(policy, date(2021, 12, 31), anchor)
                .unwrap(),
            date(2021, 1, 1)
        );
        assert_eq!(
            strategy
                .period_end(policy, date(2021, 12, 31), anchor)
                .unwrap(),
            date(2021, 12, 31)
        );
    }

    #[test]
    fn test_anniversary_yearly_bounds() {
        let policy = interval_policy(BillingInterval::Yearly);
        let strategy = anchor_strategy(BillingTime::Anniversary);
        let anchor = date(2020, 2, 2);

        assert_eq!(
            strategy
                .period_start(policy, date(2022, 2, 1), anchor)
                .unwrap(),
            date(2021, 2, 2)
        );
        assert_eq!(
            strategy
                .period_end(policy, date(2022, 2, 1), anchor)
                .unwrap(),
            date(2022, 2, 1)
        );
    }

    #[test]
    fn test_anniversary_feb_29_start_and_end_agree() {
        let policy = interval_policy(BillingInterval::Yearly);
        let strategy = anchor_strategy(BillingTime::Anniversary);
        let anchor = date(2020, 2, 29);

        let start = strategy
            .period_start(policy, date(2022, 3, 28), anchor)
            .unwrap();
        let end = strategy
            .period_end(policy, date(2022, 3, 28), anchor)
            .unwrap();
        assert_eq!(start, date(2022, 2, 28));
        assert_eq!(end, date(2023, 2, 27));
        // The next period starts the day after this one ends.
        assert_eq!(
            strategy
                .period_start(policy, end.succ_opt().unwrap(), anchor)
                .unwrap(),
            date(2023, 2, 28)
        );
    }

    #[test]
    fn test_next_period_end_is_idempotent() {
        let policy = interval_policy(BillingInterval::Monthly);
        let strategy = anchor_strategy(BillingTime::Anniversary);
        let anchor = date(2022, 1, 15);

        let end = strategy
            .next_period_end(policy, date(2022, 3, 1), anchor)
            .unwrap();
        assert_eq!(end, date(2022, 3, 14));
        assert_eq!(strategy.next_period_end(policy, end, anchor).unwrap(), end);
    }

    #[test]
    fn test_previous_period_start_toggle() {
        let policy = interval_policy(BillingInterval::Quarterly);
        let strategy = anchor_strategy(BillingTime::Calendar);
        let anchor = date(2021, 8, 20);

        assert_eq!(
            strategy
                .previous_period_start(policy, date(2022, 5, 10), anchor, true)
                .unwrap(),
            date(2022, 4, 1)
        );
        assert_eq!(
            strategy
                .previous_period_start(policy, date(2022, 5, 10), anchor, false)
                .unwrap(),
            date(2022, 1, 1)
        );
    }

    #[test]
    fn test_calendar_weekly_starts_monday() {
        let policy = interval_policy(BillingInterval::Weekly);
        let strategy = anchor_strategy(BillingTime::Calendar);
        // Anchor on a Thursday, periods still run Monday to Sunday.
        let anchor = date(2022, 1, 6);

        assert_eq!(
            strategy
                .period_start(policy, date(2022, 2, 2), anchor)
                .unwrap(),
            date(2022, 1, 31)
        );
        assert_eq!(
            strategy
                .period_end(policy, date(2022, 2, 2), anchor)
                .unwrap(),
            date(2022, 2, 6)
        );
    }
}
