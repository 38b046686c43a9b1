//! Test helper module for billing-period integration tests.
//!
//! Dates are written as ISO strings so scenarios read like invoices.

#![allow(dead_code)]

use billing_period::models::{
    BillingContext, BillingContextBuilder, BillingInterval, BillingTime, PeriodBoundaries,
};
use billing_period::services::PeriodCalculator;
use chrono::NaiveDate;

/// Parse an ISO date, panicking on malformed test input.
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid test date")
}

/// Builder for a subscription anchored and started on `anchor`.
pub fn subscription(anchor: &str, billing_time: BillingTime) -> BillingContextBuilder {
    BillingContext::builder()
        .anchor_date(d(anchor))
        .started_at(d(anchor))
        .billing_time(billing_time)
}

/// Boundaries for a context, panicking when the engine rejects it.
pub fn boundaries(context: &BillingContext, interval: BillingInterval) -> PeriodBoundaries {
    PeriodCalculator::new(context, interval)
        .boundaries()
        .expect("Failed to compute boundaries")
}

/// Assert a charges window by its ISO bounds.
pub fn assert_charges(boundaries: &PeriodBoundaries, from: &str, to: &str) {
    let window = boundaries.charges.expect("Expected a charges window");
    assert_eq!(window.from_date, d(from), "charges_from_date");
    assert_eq!(window.to_date, d(to), "charges_to_date");
}

/// Assert the invoiced period by its ISO bounds.
pub fn assert_period(boundaries: &PeriodBoundaries, from: &str, to: &str) {
    assert_eq!(boundaries.from_date, d(from), "from_date");
    assert_eq!(boundaries.to_date, d(to), "to_date");
}
