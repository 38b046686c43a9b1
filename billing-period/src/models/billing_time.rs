//! Billing time model.

use crate::error::PeriodError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How period boundaries are aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingTime {
    /// Fixed calendar units: years start on Jan 1, weeks on Monday.
    #[default]
    Calendar,
    /// The subscription's own anchor day, e.g. Feb 2 -> Feb 1 for yearly plans.
    Anniversary,
}

impl BillingTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingTime::Calendar => "calendar",
            BillingTime::Anniversary => "anniversary",
        }
    }
}

impl fmt::Display for BillingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingTime {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" => Ok(BillingTime::Calendar),
            "anniversary" => Ok(BillingTime::Anniversary),
            other => Err(PeriodError::UnknownBillingTime(other.to_string())),
        }
    }
}
