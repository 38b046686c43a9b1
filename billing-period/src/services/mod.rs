//! Services module for billing-period.

pub mod anchor;
pub mod calculator;
pub mod interval_policy;
pub mod proration;

pub use anchor::{anchor_strategy, AnchorStrategy, AnniversaryStrategy, CalendarStrategy};
pub use calculator::PeriodCalculator;
pub use interval_policy::{
    interval_policy, IntervalPolicy, MonthlyPolicy, QuarterlyPolicy, WeeklyPolicy, YearlyPolicy,
};
pub use proration::ProrationHelper;
