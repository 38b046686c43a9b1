//! Billing period calculator.
//!
//! Resolution order for every boundary:
//!
//! 1. Termination: a run on or after `terminated_at` closes out the interval
//!    containing the termination date, and every bound is clipped to it.
//! 2. Pay in advance: the invoiced interval is the one containing the
//!    reference date instead of the one that just elapsed. Usage still trails:
//!    the charges window is the interval before the invoiced one.
//! 3. Monthly charges: on cadences longer than a month the charges window
//!    narrows to the month slice that just elapsed.
//!
//! Start clamping to `started_at` applies last, to both the period and the
//! charges window.

use crate::error::PeriodError;
use crate::models::{
    BillingContext, BillingInterval, ChargesWindow, PeriodBoundaries, PeriodEvaluation,
};
use crate::services::{
    anchor_strategy, interval_policy, AnchorStrategy, IntervalPolicy, ProrationHelper,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Invoiced interval before and after clamping.
#[derive(Debug, Clone, Copy)]
struct Period {
    nominal_from: NaiveDate,
    nominal_to: NaiveDate,
    from: NaiveDate,
    to: NaiveDate,
}

/// Computes period boundaries and pricing figures for one billing context.
///
/// Stateless: every method is a pure function of the context and interval, so
/// one calculator can be shared freely and results are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct PeriodCalculator<'a> {
    context: &'a BillingContext,
    policy: &'static dyn IntervalPolicy,
    strategy: &'static dyn AnchorStrategy,
}

impl<'a> PeriodCalculator<'a> {
    pub fn new(context: &'a BillingContext, interval: BillingInterval) -> Self {
        let policy = interval_policy(interval);
        if context.bill_charges_monthly && !policy.spans_multiple_months() {
            tracing::warn!(
                interval = %interval,
                "Monthly charge billing ignored for an interval of one month or less"
            );
        }

        Self {
            context,
            policy,
            strategy: anchor_strategy(context.billing_time),
        }
    }

    pub fn context(&self) -> &BillingContext {
        self.context
    }

    pub fn interval(&self) -> BillingInterval {
        self.policy.interval()
    }

    /// Start of the invoiced period.
    pub fn from_date(&self) -> Result<NaiveDate, PeriodError> {
        Ok(self.period()?.from)
    }

    /// End of the invoiced period.
    pub fn to_date(&self) -> Result<NaiveDate, PeriodError> {
        Ok(self.period()?.to)
    }

    /// Start of the usage window, `None` when no usage can have accrued yet.
    pub fn charges_from_date(&self) -> Result<Option<NaiveDate>, PeriodError> {
        Ok(self.charges_window()?.map(|window| window.from_date))
    }

    /// End of the usage window, `None` when no usage can have accrued yet.
    pub fn charges_to_date(&self) -> Result<Option<NaiveDate>, PeriodError> {
        Ok(self.charges_window()?.map(|window| window.to_date))
    }

    pub fn charges_window(&self) -> Result<Option<ChargesWindow>, PeriodError> {
        let period = self.period()?;
        self.charges_window_for(&period)
    }

    pub fn boundaries(&self) -> Result<PeriodBoundaries, PeriodError> {
        let period = self.period()?;
        let charges = self.charges_window_for(&period)?;

        Ok(PeriodBoundaries {
            from_date: period.from,
            to_date: period.to,
            charges,
        })
    }

    /// End of the interval containing `date`.
    pub fn next_end_of_period(&self, date: NaiveDate) -> Result<NaiveDate, PeriodError> {
        self.strategy
            .next_period_end(self.policy, date, self.context.anchor_date)
    }

    /// Start of the interval before the one containing the reference date, or
    /// of that interval itself when `current_period` is set.
    pub fn previous_beginning_of_period(
        &self,
        current_period: bool,
    ) -> Result<NaiveDate, PeriodError> {
        self.strategy.previous_period_start(
            self.policy,
            self.context.reference_date,
            self.context.anchor_date,
            current_period,
        )
    }

    /// Nominal length of the invoiced interval in days.
    pub fn period_day_count(&self) -> Result<i64, PeriodError> {
        let period = self.period()?;
        ProrationHelper::period_day_count(
            self.policy,
            self.strategy,
            self.context.anchor_date,
            period.nominal_from,
        )
    }

    /// `plan_amount` divided by the nominal length of the invoiced interval.
    pub fn single_day_price(&self, plan_amount: Decimal) -> Result<Decimal, PeriodError> {
        ProrationHelper::single_day_price(plan_amount, self.period_day_count()?)
    }

    /// `plan_amount` divided by the length of the interval containing `date`.
    pub fn single_day_price_at(
        &self,
        plan_amount: Decimal,
        date: NaiveDate,
    ) -> Result<Decimal, PeriodError> {
        let day_count = ProrationHelper::period_day_count(
            self.policy,
            self.strategy,
            self.context.anchor_date,
            date,
        )?;
        ProrationHelper::single_day_price(plan_amount, day_count)
    }

    /// Nominal length of the charges interval: the full plan interval, or the
    /// month slice when monthly charges apply.
    pub fn charges_duration_in_days(&self) -> Result<i64, PeriodError> {
        let period = self.period()?;
        let (start, end) = self.charges_interval(&period)?;
        ProrationHelper::inclusive_day_span(start, end)
    }

    /// Days actually invoiced after start clamping and termination clipping.
    pub fn days_billed(&self) -> Result<i64, PeriodError> {
        let period = self.period()?;
        ProrationHelper::inclusive_day_span(period.from, period.to)
    }

    /// Subscription fee for the days billed, rounded to `scale` places.
    pub fn prorated_amount(
        &self,
        plan_amount: Decimal,
        scale: u32,
    ) -> Result<Decimal, PeriodError> {
        ProrationHelper::prorate(
            plan_amount,
            self.period_day_count()?,
            self.days_billed()?,
            scale,
        )
    }

    /// Compute every figure an invoicing run needs in one pass.
    #[tracing::instrument(
        skip_all,
        fields(
            interval = %self.policy.interval(),
            billing_time = %self.context.billing_time,
            reference_date = %self.context.reference_date,
        )
    )]
    pub fn evaluate(
        &self,
        plan_amount: Decimal,
        scale: u32,
    ) -> Result<PeriodEvaluation, PeriodError> {
        let evaluation = self.evaluate_inner(plan_amount, scale).inspect_err(|e| {
            tracing::warn!(error = %e, kind = e.kind(), "Billing period evaluation failed");
        })?;

        tracing::debug!(
            from_date = %evaluation.boundaries.from_date,
            to_date = %evaluation.boundaries.to_date,
            charges_from_date = ?evaluation.boundaries.charges_from_date(),
            charges_to_date = ?evaluation.boundaries.charges_to_date(),
            period_day_count = evaluation.period_day_count,
            days_billed = evaluation.days_billed,
            "Billing period evaluated"
        );

        Ok(evaluation)
    }

    fn evaluate_inner(
        &self,
        plan_amount: Decimal,
        scale: u32,
    ) -> Result<PeriodEvaluation, PeriodError> {
        let period = self.period()?;
        let charges = self.charges_window_for(&period)?;
        let (charges_start, charges_end) = self.charges_interval(&period)?;

        let period_day_count =
            ProrationHelper::inclusive_day_span(period.nominal_from, period.nominal_to)?;
        let days_billed = ProrationHelper::inclusive_day_span(period.from, period.to)?;

        Ok(PeriodEvaluation {
            interval: self.policy.interval(),
            billing_time: self.context.billing_time,
            boundaries: PeriodBoundaries {
                from_date: period.from,
                to_date: period.to,
                charges,
            },
            period_day_count,
            days_billed,
            single_day_price: ProrationHelper::single_day_price(plan_amount, period_day_count)?,
            prorated_amount: ProrationHelper::prorate(
                plan_amount,
                period_day_count,
                days_billed,
                scale,
            )?,
            charges_duration_in_days: ProrationHelper::inclusive_day_span(
                charges_start,
                charges_end,
            )?,
        })
    }

    /// Date whose interval is invoiced.
    fn base_date(&self) -> Result<NaiveDate, PeriodError> {
        if let Some(terminated_at) = self.context.terminated_at {
            if self.context.reference_date >= terminated_at {
                return Ok(terminated_at);
            }
        }

        if self.context.pay_in_advance {
            Ok(self.context.reference_date)
        } else {
            self.elapsed_date()
        }
    }

    /// Last day before the reference date, i.e. the last day already consumed.
    fn elapsed_date(&self) -> Result<NaiveDate, PeriodError> {
        self.context
            .reference_date
            .pred_opt()
            .ok_or(PeriodError::DateOutOfRange)
    }

    fn period(&self) -> Result<Period, PeriodError> {
        let base = self.base_date()?;
        let anchor = self.context.anchor_date;
        let nominal_from = self.strategy.period_start(self.policy, base, anchor)?;
        let nominal_to = self.strategy.period_end(self.policy, base, anchor)?;

        let from = nominal_from.max(self.context.started_at);
        let to = self.clip_to_termination(nominal_to);
        if to < from {
            return Err(PeriodError::InvalidPeriod { from, to });
        }

        Ok(Period {
            nominal_from,
            nominal_to,
            from,
            to,
        })
    }

    fn clip_to_termination(&self, date: NaiveDate) -> NaiveDate {
        match self.context.terminated_at {
            Some(terminated_at) if terminated_at < date => terminated_at,
            _ => date,
        }
    }

    fn bills_charges_monthly(&self) -> bool {
        self.context.bill_charges_monthly && self.policy.spans_multiple_months()
    }

    /// Charges trail the invoiced period only for pay-in-advance plans that are
    /// still running.
    fn charges_trail_period(&self) -> bool {
        self.context.pay_in_advance && !self.context.is_terminated_at_reference()
    }

    /// Unclamped charges interval.
    fn charges_interval(&self, period: &Period) -> Result<(NaiveDate, NaiveDate), PeriodError> {
        let anchor = self.context.anchor_date;

        if self.bills_charges_monthly() {
            let base = match self.context.terminated_at {
                Some(terminated_at) if self.context.is_terminated_at_reference() => terminated_at,
                _ => self.elapsed_date()?,
            };
            let monthly = interval_policy(BillingInterval::Monthly);
            let start = self.strategy.period_start(monthly, base, anchor)?;
            let end = self.strategy.period_end(monthly, base, anchor)?;
            return Ok((start, end));
        }

        if self.charges_trail_period() {
            let end = period
                .nominal_from
                .pred_opt()
                .ok_or(PeriodError::DateOutOfRange)?;
            let start = self.strategy.period_start(self.policy, end, anchor)?;
            return Ok((start, end));
        }

        Ok((period.nominal_from, period.nominal_to))
    }

    fn charges_window_for(&self, period: &Period) -> Result<Option<ChargesWindow>, PeriodError> {
        let (start, end) = self.charges_interval(period)?;
        let mut from = start.max(self.context.started_at);
        let mut to = self.clip_to_termination(end);

        if !self.charges_trail_period() {
            from = from.max(period.from);
            to = to.min(period.to);
        }

        if to < from {
            tracing::debug!(
                charges_from_date = %from,
                charges_to_date = %to,
                "Charges window precedes the subscription start"
            );
            return Ok(None);
        }

        Ok(Some(ChargesWindow {
            from_date: from,
            to_date: to,
        }))
    }
}
