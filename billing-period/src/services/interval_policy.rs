//! Cadence arithmetic, one policy per billing interval.
//!
//! A policy knows how far apart two boundaries are and how to find the boundary
//! at or before a date for a cadence anchored on a given day. Month-based
//! cadences (monthly, quarterly, yearly) recompute every boundary from the
//! anchor's day-of-month, so a Jan 31 anchor yields Feb 28 and then Mar 31
//! again instead of drifting to Mar 28.

use crate::error::PeriodError;
use crate::models::BillingInterval;
use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

/// Interval arithmetic for one billing cadence.
pub trait IntervalPolicy: fmt::Debug + Send + Sync {
    fn interval(&self) -> BillingInterval;

    /// Start of the calendar unit (year, quarter, month, ISO week) containing `date`.
    fn calendar_start(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError>;

    /// Latest boundary on or before `date` for a cadence anchored on `anchor`.
    fn boundary_on_or_before(
        &self,
        date: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError>;

    /// Boundary `count` intervals away from `boundary`; negative counts move back.
    fn shift(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
        count: i64,
    ) -> Result<NaiveDate, PeriodError>;

    /// Whether one interval covers more than a single month, which is what
    /// makes monthly charge slices meaningful.
    fn spans_multiple_months(&self) -> bool {
        false
    }

    fn add_interval(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        self.shift(boundary, anchor, 1)
    }

    fn subtract_interval(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        self.shift(boundary, anchor, -1)
    }

    /// Days between `boundary` and the next boundary.
    fn interval_length_in_days(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<i64, PeriodError> {
        let next = self.add_interval(boundary, anchor)?;
        Ok((next - boundary).num_days())
    }
}

/// Policy for a billing interval.
pub fn interval_policy(interval: BillingInterval) -> &'static dyn IntervalPolicy {
    match interval {
        BillingInterval::Weekly => &WeeklyPolicy,
        BillingInterval::Monthly => &MonthlyPolicy,
        BillingInterval::Quarterly => &QuarterlyPolicy,
        BillingInterval::Yearly => &YearlyPolicy,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct QuarterlyPolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct YearlyPolicy;

const DAYS_PER_WEEK: i64 = 7;

impl IntervalPolicy for WeeklyPolicy {
    fn interval(&self) -> BillingInterval {
        BillingInterval::Weekly
    }

    fn calendar_start(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError> {
        let offset = u64::from(date.weekday().num_days_from_monday());
        date.checked_sub_days(Days::new(offset))
            .ok_or(PeriodError::DateOutOfRange)
    }

    fn boundary_on_or_before(
        &self,
        date: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        let offset = (date - anchor).num_days().rem_euclid(DAYS_PER_WEEK);
        shift_days(date, -offset)
    }

    fn shift(
        &self,
        boundary: NaiveDate,
        _anchor: NaiveDate,
        count: i64,
    ) -> Result<NaiveDate, PeriodError> {
        let days = count
            .checked_mul(DAYS_PER_WEEK)
            .ok_or(PeriodError::DateOutOfRange)?;
        shift_days(boundary, days)
    }
}

impl IntervalPolicy for MonthlyPolicy {
    fn interval(&self) -> BillingInterval {
        BillingInterval::Monthly
    }

    fn calendar_start(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError> {
        date.with_day(1).ok_or(PeriodError::DateOutOfRange)
    }

    fn boundary_on_or_before(
        &self,
        date: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        month_boundary_on_or_before(date, anchor, 1)
    }

    fn shift(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
        count: i64,
    ) -> Result<NaiveDate, PeriodError> {
        shift_months(boundary, anchor, count)
    }
}

impl IntervalPolicy for QuarterlyPolicy {
    fn interval(&self) -> BillingInterval {
        BillingInterval::Quarterly
    }

    fn calendar_start(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError> {
        let quarter_month = date.month0() - date.month0() % 3 + 1;
        NaiveDate::from_ymd_opt(date.year(), quarter_month, 1).ok_or(PeriodError::DateOutOfRange)
    }

    fn boundary_on_or_before(
        &self,
        date: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        month_boundary_on_or_before(date, anchor, 3)
    }

    fn shift(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
        count: i64,
    ) -> Result<NaiveDate, PeriodError> {
        let months = count.checked_mul(3).ok_or(PeriodError::DateOutOfRange)?;
        shift_months(boundary, anchor, months)
    }

    fn spans_multiple_months(&self) -> bool {
        true
    }
}

impl IntervalPolicy for YearlyPolicy {
    fn interval(&self) -> BillingInterval {
        BillingInterval::Yearly
    }

    fn calendar_start(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError> {
        NaiveDate::from_ymd_opt(date.year(), 1, 1).ok_or(PeriodError::DateOutOfRange)
    }

    fn boundary_on_or_before(
        &self,
        date: NaiveDate,
        anchor: NaiveDate,
    ) -> Result<NaiveDate, PeriodError> {
        month_boundary_on_or_before(date, anchor, 12)
    }

    fn shift(
        &self,
        boundary: NaiveDate,
        anchor: NaiveDate,
        count: i64,
    ) -> Result<NaiveDate, PeriodError> {
        let months = count.checked_mul(12).ok_or(PeriodError::DateOutOfRange)?;
        shift_months(boundary, anchor, months)
    }

    fn spans_multiple_months(&self) -> bool {
        true
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, PeriodError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(PeriodError::DateOutOfRange)
}

/// Calendar months from `anchor`'s month to `date`'s month, ignoring days.
fn months_since(anchor: NaiveDate, date: NaiveDate) -> i64 {
    let years = i64::from(date.year() - anchor.year());
    years * 12 + i64::from(date.month0()) - i64::from(anchor.month0())
}

/// `anchor` moved by `months`. Chrono clamps to the last day of a shorter
/// target month, and every boundary is measured from the anchor itself, so
/// clamping never accumulates.
fn offset_from_anchor(anchor: NaiveDate, months: i64) -> Result<NaiveDate, PeriodError> {
    let count = u32::try_from(months.unsigned_abs()).map_err(|_| PeriodError::DateOutOfRange)?;
    let shifted = if months >= 0 {
        anchor.checked_add_months(Months::new(count))
    } else {
        anchor.checked_sub_months(Months::new(count))
    };
    shifted.ok_or(PeriodError::DateOutOfRange)
}

fn month_boundary_on_or_before(
    date: NaiveDate,
    anchor: NaiveDate,
    months: i64,
) -> Result<NaiveDate, PeriodError> {
    let elapsed = months_since(anchor, date).div_euclid(months) * months;
    let boundary = offset_from_anchor(anchor, elapsed)?;
    if boundary <= date {
        Ok(boundary)
    } else {
        offset_from_anchor(anchor, elapsed - months)
    }
}

fn shift_months(
    boundary: NaiveDate,
    anchor: NaiveDate,
    months: i64,
) -> Result<NaiveDate, PeriodError> {
    let target = months_since(anchor, boundary)
        .checked_add(months)
        .ok_or(PeriodError::DateOutOfRange)?;
    offset_from_anchor(anchor, target)
}
