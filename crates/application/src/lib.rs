//! Application layer
//!
//! Ports and services that orchestrate the domain without knowing about
//! HTTP clients or SQLite. Adapters in the infrastructure layer implement
//! the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{
    AlertThresholds, DashboardService, DashboardSnapshot, FailurePolicy, TrendReport,
};
