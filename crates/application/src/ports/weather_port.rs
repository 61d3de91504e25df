//! Weather provider port
//!
//! Defines the interface for fetching live weather data.

use async_trait::async_trait;
use domain::{ForecastDay, GeoLocation, Observation, WeatherAlert};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather provider operations
///
/// A city is resolved to coordinates once per query; the fetch operations
/// take the resolved location so a refresh geocodes exactly once.
#[allow(clippy::struct_field_names)] // automock generates struct with `get_*` prefixes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProviderPort: Send + Sync {
    /// Resolve a city name to coordinates
    async fn geocode(&self, city: &str) -> Result<GeoLocation, ApplicationError>;

    /// Current conditions at a resolved location
    ///
    /// The returned observation carries no city label; the caller owns the
    /// mapping from location back to the city name it resolved.
    async fn get_current(&self, location: GeoLocation) -> Result<Observation, ApplicationError>;

    /// Daily forecast at a resolved location
    ///
    /// # Arguments
    /// * `location` - Coordinates from a prior `geocode`
    /// * `days` - Number of days to forecast (typically 1-7)
    async fn get_forecast(
        &self,
        location: GeoLocation,
        days: u8,
    ) -> Result<Vec<ForecastDay>, ApplicationError>;

    /// Active severe-weather alerts at a resolved location
    ///
    /// No active alerts is an empty list, not an error.
    async fn get_alerts(&self, location: GeoLocation) -> Result<Vec<WeatherAlert>, ApplicationError>;
}
