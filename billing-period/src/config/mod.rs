use crate::error::PeriodError;
use crate::models::{BillingContext, BillingInterval, BillingTime};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use service_core::config::{self as core_config, load_settings};
use service_core::error::AppError;
use std::path::Path;

/// Largest scale a `rust_decimal::Decimal` can hold.
const MAX_DECIMAL_SCALE: u32 = 28;

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    /// Decimal places kept on prorated amounts. Plan amounts are minor units,
    /// so the default keeps whole cents.
    #[serde(default)]
    pub proration_scale: u32,
    pub context: ContextSettings,
}

/// One billing context as read from configuration.
///
/// Dates are optional here so that a missing value surfaces as the engine's
/// own precondition error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextSettings {
    pub interval: BillingInterval,
    #[serde(default)]
    pub billing_time: BillingTime,
    pub anchor_date: Option<NaiveDate>,
    pub started_at: Option<NaiveDate>,
    pub terminated_at: Option<NaiveDate>,
    #[serde(default)]
    pub pay_in_advance: bool,
    #[serde(default)]
    pub bill_charges_monthly: bool,
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub plan_amount: Decimal,
}

impl ContextSettings {
    /// Build the engine context, using `today` when no reference date is configured.
    pub fn to_context(&self, today: NaiveDate) -> Result<BillingContext, PeriodError> {
        let mut builder = BillingContext::builder()
            .terminated_at(self.terminated_at)
            .billing_time(self.billing_time)
            .pay_in_advance(self.pay_in_advance)
            .bill_charges_monthly(self.bill_charges_monthly)
            .reference_date(self.reference_date.unwrap_or(today));

        if let Some(anchor_date) = self.anchor_date {
            builder = builder.anchor_date(anchor_date);
        }
        if let Some(started_at) = self.started_at {
            builder = builder.started_at(started_at);
        }

        builder.build()
    }
}

impl PeriodConfig {
    /// Load from `configuration.*` in the working directory plus `APP__` overrides.
    pub fn from_env() -> Result<Self, AppError> {
        let config: PeriodConfig = load_settings("configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file plus `APP__` overrides.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let file = path.to_str().ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "Configuration path is not valid UTF-8: {}",
                path.display()
            ))
        })?;
        let config: PeriodConfig = load_settings(file)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.proration_scale > MAX_DECIMAL_SCALE {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PRORATION_SCALE must be at most {}",
                MAX_DECIMAL_SCALE
            )));
        }

        if self.context.plan_amount.is_sign_negative() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "CONTEXT__PLAN_AMOUNT must not be negative"
            )));
        }

        Ok(())
    }
}
