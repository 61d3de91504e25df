//! Application services

mod dashboard_service;

pub use dashboard_service::{
    AlertThresholds, DashboardService, DashboardSnapshot, FailurePolicy, TrendReport,
};
