//! Billing period engine.
//!
//! Computes, for one subscription and billing run, the inclusive bounds of the
//! invoiced period, the usage-charge window inside it, and the per-day price
//! used for proration. Every input is explicit (the reference date included),
//! so results are deterministic and never depend on the system clock.
//!
//! ```
//! use billing_period::models::{BillingContext, BillingInterval, BillingTime};
//! use billing_period::services::PeriodCalculator;
//! use chrono::NaiveDate;
//!
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//! let context = BillingContext::builder()
//!     .anchor_date(date(2020, 2, 2))
//!     .started_at(date(2020, 2, 2))
//!     .billing_time(BillingTime::Anniversary)
//!     .reference_date(date(2022, 2, 2))
//!     .build()
//!     .unwrap();
//!
//! let calculator = PeriodCalculator::new(&context, BillingInterval::Yearly);
//! assert_eq!(calculator.from_date().unwrap(), date(2021, 2, 2));
//! assert_eq!(calculator.to_date().unwrap(), date(2022, 2, 1));
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::PeriodError;
