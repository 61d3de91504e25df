//! Temperature prediction port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the optional temperature prediction model
///
/// A missing or unloadable model surfaces as
/// [`ApplicationError::PredictionUnavailable`]; callers are expected to
/// degrade gracefully rather than fail the dashboard.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PredictionPort: Send + Sync {
    /// Predict temperatures for the given day indices
    ///
    /// Indices continue the history series: if 30 observations exist,
    /// index 30 is tomorrow.
    async fn predict(&self, day_indices: &[f64]) -> Result<Vec<f64>, ApplicationError>;
}
