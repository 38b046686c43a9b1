//! Domain models for billing-period.

mod billing_time;
mod boundaries;
mod context;
mod interval;

pub use billing_time::BillingTime;
pub use boundaries::{ChargesWindow, PeriodBoundaries, PeriodEvaluation};
pub use context::{BillingContext, BillingContextBuilder};
pub use interval::BillingInterval;
