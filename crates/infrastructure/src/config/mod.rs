//! Application configuration
//!
//! Layered load: built-in defaults, then an optional `config` file, then
//! environment variables with the `WEATHERDECK_` prefix. Nested keys use a
//! double underscore (`WEATHERDECK_WEATHER__API_KEY` sets
//! `weather.api_key`); `features` accepts a comma-separated list.

mod database;

use application::services::{AlertThresholds, FailurePolicy};
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use database::DatabaseConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log filter, e.g. "info" or "weatherdeck=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// What to do when the live fetch fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Local temperature advisory thresholds
    #[serde(default)]
    pub alerts: AlertThresholds,

    /// Enabled optional features, e.g. ["prediction"]
    #[serde(default)]
    pub features: Vec<String>,

    /// Path to the prediction model file; prediction is disabled when unset
    #[serde(default)]
    pub prediction_model_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from defaults, optional file and environment
    ///
    /// # Errors
    ///
    /// Returns an error when the file or environment contain values that
    /// do not deserialize, or when validation fails.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("weather.api_key", "")?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., WEATHERDECK_WEATHER__API_KEY);
            // "__" nests, so snake_case keys like api_key stay intact
            .add_source(
                config::Environment::with_prefix("WEATHERDECK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("features")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on configuration that cannot work at runtime
    ///
    /// # Errors
    ///
    /// Returns an error when the provider API key is missing.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.weather.api_key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "weather.api_key must be set (WEATHERDECK_WEATHER__API_KEY)".to_string(),
            ));
        }
        if self.feature_enabled("prediction") && self.prediction_model_path.is_none() {
            warn!("prediction feature enabled but prediction_model_path is unset");
        }
        Ok(())
    }

    /// Whether an optional feature is enabled
    #[must_use]
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.eq_ignore_ascii_case(name))
    }
}
