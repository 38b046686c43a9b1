//! Error types for the billing period engine.

use chrono::NaiveDate;
use service_core::error::AppError;
use thiserror::Error;

/// Errors raised while building a context or computing its periods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid billing context: {0}")]
    InvalidContext(String),

    #[error("Invalid period: to_date {to} precedes from_date {from}")]
    InvalidPeriod { from: NaiveDate, to: NaiveDate },

    #[error("Invalid day span: {to} precedes {from}")]
    InvalidSpan { from: NaiveDate, to: NaiveDate },

    #[error("Period day count must be positive")]
    ZeroLengthPeriod,

    #[error("Date arithmetic left the supported calendar range")]
    DateOutOfRange,

    #[error("Amount arithmetic overflowed")]
    AmountOverflow,

    #[error("Unknown billing interval: {0}")]
    UnknownInterval(String),

    #[error("Unknown billing time: {0}")]
    UnknownBillingTime(String),
}

impl PeriodError {
    /// Label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PeriodError::MissingField(_) => "missing_field",
            PeriodError::InvalidContext(_) => "invalid_context",
            PeriodError::InvalidPeriod { .. } => "invalid_period",
            PeriodError::InvalidSpan { .. } => "invalid_span",
            PeriodError::ZeroLengthPeriod => "zero_length_period",
            PeriodError::DateOutOfRange => "date_out_of_range",
            PeriodError::AmountOverflow => "amount_overflow",
            PeriodError::UnknownInterval(_) => "unknown_interval",
            PeriodError::UnknownBillingTime(_) => "unknown_billing_time",
        }
    }
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        match err {
            PeriodError::DateOutOfRange | PeriodError::AmountOverflow => {
                AppError::InternalError(anyhow::Error::new(err))
            }
            _ => AppError::BadRequest(anyhow::Error::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_errors_map_to_bad_request() {
        let err: AppError = PeriodError::MissingField("anchor_date").into();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("anchor_date"));
    }

    #[test]
    fn test_range_error_maps_to_internal() {
        let err: AppError = PeriodError::DateOutOfRange.into();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[test]
    fn test_invalid_period_message_names_both_dates() {
        let err = PeriodError::InvalidPeriod {
            from: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2022, 2, 28).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid period: to_date 2022-02-28 precedes from_date 2022-03-01"
        );
        assert_eq!(err.kind(), "invalid_period");
    }
}
