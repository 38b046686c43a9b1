//! Period boundary models returned by the calculator.

use crate::models::{BillingInterval, BillingTime};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive usage-charge window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargesWindow {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl ChargesWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from_date && date <= self.to_date
    }
}

/// Inclusive bounds of the invoiced period and its charges window.
///
/// `charges` is `None` when no usage can have accrued yet, which happens on the
/// first pay-in-advance invoice: the window trails the invoiced period and lies
/// entirely before `started_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBoundaries {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub charges: Option<ChargesWindow>,
}

impl PeriodBoundaries {
    pub fn charges_from_date(&self) -> Option<NaiveDate> {
        self.charges.map(|window| window.from_date)
    }

    pub fn charges_to_date(&self) -> Option<NaiveDate> {
        self.charges.map(|window| window.to_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from_date && date <= self.to_date
    }
}

/// Everything an invoicing run needs for one subscription and cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEvaluation {
    pub interval: BillingInterval,
    pub billing_time: BillingTime,
    pub boundaries: PeriodBoundaries,
    /// Nominal length of the invoiced interval, the pricing denominator.
    pub period_day_count: i64,
    /// Days actually billed after start clamping and termination clipping.
    pub days_billed: i64,
    pub single_day_price: Decimal,
    pub prorated_amount: Decimal,
    pub charges_duration_in_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charges_accessors() {
        let from = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap();
        let boundaries = PeriodBoundaries {
            from_date: from,
            to_date: to,
            charges: Some(ChargesWindow {
                from_date: from,
                to_date: to,
            }),
        };

        assert_eq!(boundaries.charges_from_date(), Some(from));
        assert_eq!(boundaries.charges_to_date(), Some(to));
        assert!(boundaries.contains(NaiveDate::from_ymd_opt(2021, 6, 30).unwrap()));
        assert!(!boundaries.contains(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()));

        let without_charges = PeriodBoundaries {
            charges: None,
            ..boundaries
        };
        assert_eq!(without_charges.charges_from_date(), None);
    }

    #[test]
    fn test_serializes_dates_as_iso() {
        let window = ChargesWindow {
            from_date: NaiveDate::from_ymd_opt(2022, 2, 28).unwrap(),
            to_date: NaiveDate::from_ymd_opt(2022, 3, 28).unwrap(),
        };
        let json = serde_json::to_value(window).unwrap();
        assert_eq!(json["from_date"], "2022-02-28");
        assert_eq!(json["to_date"], "2022-03-28");
    }
}
