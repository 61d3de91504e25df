//! Prediction adapter - linear temperature model loaded from a JSON file
//!
//! The model file holds the two fitted coefficients:
//!
//! ```json
//! { "slope": 0.12, "intercept": 71.5 }
//! ```
//!
//! A missing or unreadable file reports `PredictionUnavailable` so the
//! dashboard degrades instead of failing.

use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::PredictionPort;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Fitted linear model coefficients
#[derive(Debug, Clone, Copy, Deserialize)]
struct LinearModel {
    slope: f64,
    intercept: f64,
}

impl LinearModel {
    fn predict(self, day_index: f64) -> f64 {
        self.slope.mul_add(day_index, self.intercept)
    }
}

/// File-backed linear prediction model
///
/// The file is read on every call so a retrained model is picked up
/// without a restart.
#[derive(Debug, Clone)]
pub struct LinearPredictionAdapter {
    model_path: PathBuf,
}

impl LinearPredictionAdapter {
    /// Create an adapter reading coefficients from the given path
    #[must_use]
    pub fn new(model_path: impl AsRef<Path>) -> Self {
        Self {
            model_path: model_path.as_ref().to_path_buf(),
        }
    }

    async fn load_model(&self) -> Result<LinearModel, ApplicationError> {
        let bytes = tokio::fs::read(&self.model_path).await.map_err(|e| {
            ApplicationError::PredictionUnavailable(format!(
                "Cannot read model file {}: {e}",
                self.model_path.display()
            ))
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            ApplicationError::PredictionUnavailable(format!(
                "Model file {} is not valid: {e}",
                self.model_path.display()
            ))
        })
    }
}

#[async_trait]
impl PredictionPort for LinearPredictionAdapter {
    #[instrument(skip(self, day_indices), fields(count = day_indices.len()))]
    async fn predict(&self, day_indices: &[f64]) -> Result<Vec<f64>, ApplicationError> {
        let model = self.load_model().await?;
        debug!(slope = model.slope, intercept = model.intercept, "Loaded model");

        Ok(day_indices.iter().map(|&i| model.predict(i)).collect())
    }
}
