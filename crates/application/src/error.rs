//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// City could not be resolved to coordinates
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// Weather provider error
    #[error("Weather provider error: {0}")]
    Provider(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// History store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Prediction model is not configured or could not be loaded
    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::RateLimited)
    }
}
