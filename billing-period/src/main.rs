//! Billing period dry-run entry point.
//!
//! Evaluates the billing context found in configuration and prints the
//! evaluation as JSON on stdout. Logs go to stderr.

use billing_period::config::PeriodConfig;
use billing_period::services::PeriodCalculator;
use chrono::Utc;
use service_core::error::AppError;
use service_core::observability::init_tracing;
use std::io::ErrorKind;

fn main() -> std::io::Result<()> {
    // Load configuration
    let config = PeriodConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        into_io_error(e)
    })?;

    // Initialize tracing
    init_tracing(&config.common.service_name, &config.common.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        interval = %config.context.interval,
        billing_time = %config.context.billing_time,
        pay_in_advance = config.context.pay_in_advance,
        bill_charges_monthly = config.context.bill_charges_monthly,
        "Starting billing-period"
    );

    let output = run(&config).map_err(|e| {
        tracing::error!(
            error = %e,
            client_error = e.is_client_error(),
            "Billing period evaluation failed"
        );
        into_io_error(e)
    })?;

    println!("{}", output);
    Ok(())
}

fn run(config: &PeriodConfig) -> Result<String, AppError> {
    // The engine never reads the clock; today is only a default for the dry run.
    let today = Utc::now().date_naive();
    let context = config.context.to_context(today)?;

    let calculator = PeriodCalculator::new(&context, config.context.interval);
    let evaluation = calculator.evaluate(config.context.plan_amount, config.proration_scale)?;

    serde_json::to_string_pretty(&evaluation).map_err(|e| AppError::InternalError(e.into()))
}

/// Rejected input surfaces as `InvalidInput`, everything else as `Other`.
fn into_io_error(err: AppError) -> std::io::Error {
    let kind = if err.is_client_error() {
        ErrorKind::InvalidInput
    } else {
        ErrorKind::Other
    };
    std::io::Error::new(kind, err.to_string())
}
