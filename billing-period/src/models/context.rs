//! Billing context model.

use crate::error::PeriodError;
use crate::models::BillingTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subscription and plan state a period computation is evaluated against.
///
/// Built once per billing cycle by the invoicing job and never mutated. Use
/// [`BillingContext::builder`] so missing or contradictory dates are reported
/// before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingContext {
    /// Original subscription date; anniversary periods align to it.
    pub anchor_date: NaiveDate,
    /// First active day. Periods never start before it.
    pub started_at: NaiveDate,
    /// Last active day, when the subscription has ended.
    pub terminated_at: Option<NaiveDate>,
    pub billing_time: BillingTime,
    /// Invoice the upcoming interval instead of the elapsed one.
    pub pay_in_advance: bool,
    /// Slice usage charges into monthly windows inside a longer interval.
    pub bill_charges_monthly: bool,
    /// Date the invoicing run is evaluated on.
    pub reference_date: NaiveDate,
}

impl BillingContext {
    pub fn builder() -> BillingContextBuilder {
        BillingContextBuilder::default()
    }

    /// True when the reference date is on or after termination, i.e. this run
    /// closes out the interval the subscription ended in.
    pub fn is_terminated_at_reference(&self) -> bool {
        self.terminated_at
            .map(|terminated_at| self.reference_date >= terminated_at)
            .unwrap_or(false)
    }
}

/// Builder for [`BillingContext`].
#[derive(Debug, Clone, Default)]
pub struct BillingContextBuilder {
    anchor_date: Option<NaiveDate>,
    started_at: Option<NaiveDate>,
    terminated_at: Option<NaiveDate>,
    billing_time: BillingTime,
    pay_in_advance: bool,
    bill_charges_monthly: bool,
    reference_date: Option<NaiveDate>,
}

impl BillingContextBuilder {
    pub fn anchor_date(mut self, date: NaiveDate) -> Self {
        self.anchor_date = Some(date);
        self
    }

    pub fn started_at(mut self, date: NaiveDate) -> Self {
        self.started_at = Some(date);
        self
    }

    pub fn terminated_at(mut self, date: Option<NaiveDate>) -> Self {
        self.terminated_at = date;
        self
    }

    pub fn billing_time(mut self, billing_time: BillingTime) -> Self {
        self.billing_time = billing_time;
        self
    }

    pub fn pay_in_advance(mut self, pay_in_advance: bool) -> Self {
        self.pay_in_advance = pay_in_advance;
        self
    }

    pub fn bill_charges_monthly(mut self, bill_charges_monthly: bool) -> Self {
        self.bill_charges_monthly = bill_charges_monthly;
        self
    }

    pub fn reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Validate and build the context.
    ///
    /// Fails when a required date is missing or when the subscription is
    /// terminated before it started.
    pub fn build(self) -> Result<BillingContext, PeriodError> {
        let anchor_date = self
            .anchor_date
            .ok_or(PeriodError::MissingField("anchor_date"))?;
        let started_at = self
            .started_at
            .ok_or(PeriodError::MissingField("started_at"))?;
        let reference_date = self
            .reference_date
            .ok_or(PeriodError::MissingField("reference_date"))?;

        if let Some(terminated_at) = self.terminated_at {
            if terminated_at < started_at {
                return Err(PeriodError::InvalidContext(format!(
                    "terminated_at {} precedes started_at {}",
                    terminated_at, started_at
                )));
            }
        }

        Ok(BillingContext {
            anchor_date,
            started_at,
            terminated_at: self.terminated_at,
            billing_time: self.billing_time,
            pay_in_advance: self.pay_in_advance,
            bill_charges_monthly: self.bill_charges_monthly,
            reference_date,
        })
    }
}
