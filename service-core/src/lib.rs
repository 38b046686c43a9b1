//! service-core: Shared infrastructure for the billing-period workspace.
pub mod config;
pub mod error;
pub mod observability;
