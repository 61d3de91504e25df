//! OpenWeatherMap-compatible weather client
//!
//! Resolves city names through the geocoding endpoint, then fetches
//! conditions from the one-call endpoint. Every network call runs under
//! the configured retry budget. The client holds no cache; staleness
//! decisions belong to the caller.

use async_trait::async_trait;
use domain::{ForecastDay, GeoLocation, Observation, Units, WeatherAlert};
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{GeocodeEntry, OneCallResponse};
use crate::retry::{Retryable, RetryConfig, with_retry};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Failed to parse response from the weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Geocoder found no match for the city
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// API key was rejected
    #[error("Unauthorized: check the configured API key")]
    Unauthorized,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl Retryable for WeatherError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::Timeout(_)
                | Self::ServiceUnavailable(_)
                | Self::RateLimitExceeded
        )
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Provider API key
    pub api_key: String,

    /// One-call endpoint base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Geocoding endpoint base URL
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of forecast days to return (1-8, default: 7)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Unit system sent with every request
    #[serde(default)]
    pub units: Units,

    /// Description language code (default: "en")
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Retry budget for provider calls
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocode_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_forecast_days() -> u8 {
    7
}

fn default_lang() -> String {
    "en".to_string()
}

impl WeatherConfig {
    /// Configuration with defaults for everything but the API key
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            geocode_url: default_geocode_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
            units: Units::default(),
            lang: default_lang(),
            retry: RetryConfig::default(),
        }
    }
}

/// Weather provider operations
///
/// `geocode` resolves a city name once; the fetch operations take the
/// resolved coordinates so callers do not pay a geocoding round trip per
/// request.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Resolve a city name to coordinates
    async fn geocode(&self, city: &str) -> Result<GeoLocation, WeatherError>;

    /// Fetch current conditions at a location
    async fn get_current(&self, location: GeoLocation) -> Result<Observation, WeatherError>;

    /// Fetch the daily forecast at a location, truncated to `days`
    async fn get_daily(
        &self,
        location: GeoLocation,
        days: u8,
    ) -> Result<Vec<ForecastDay>, WeatherError>;

    /// Fetch active severe-weather alerts at a location
    async fn get_alerts(&self, location: GeoLocation) -> Result<Vec<WeatherAlert>, WeatherError>;
}

/// HTTP implementation of [`WeatherApi`]
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
    units: RwLock<Units>,
    lang: RwLock<String>,
}

impl OpenWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        let units = config.units;
        let lang = config.lang.clone();
        Ok(Self {
            client,
            config,
            units: RwLock::new(units),
            lang: RwLock::new(lang),
        })
    }

    /// Switch the unit system for subsequent requests
    pub fn set_units(&self, units: Units) {
        *self.units.write() = units;
    }

    /// Current unit system
    #[must_use]
    pub fn units(&self) -> Units {
        *self.units.read()
    }

    /// Switch the description language for subsequent requests
    pub fn set_lang(&self, lang: impl Into<String>) {
        *self.lang.write() = lang.into();
    }

    /// Current description language
    #[must_use]
    pub fn lang(&self) -> String {
        self.lang.read().clone()
    }

    fn map_request_error(e: &reqwest::Error) -> WeatherError {
        if e.is_timeout() {
            WeatherError::Timeout(e.to_string())
        } else if e.is_connect() {
            WeatherError::ConnectionFailed(e.to_string())
        } else {
            WeatherError::RequestFailed(e.to_string())
        }
    }

    fn check_status(status: reqwest::StatusCode) -> Result<(), WeatherError> {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(WeatherError::Unauthorized);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }
        Ok(())
    }

    /// One GET with status mapping, used inside the retry loop
    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Self::map_request_error(&e))?;

        Self::check_status(response.status())?;

        response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))
    }

    async fn one_call(
        &self,
        location: GeoLocation,
        exclude: &str,
    ) -> Result<OneCallResponse, WeatherError> {
        let url = format!("{}/onecall", self.config.base_url);
        let query = vec![
            ("lat", location.latitude().to_string()),
            ("lon", location.longitude().to_string()),
            ("exclude", exclude.to_string()),
            ("units", self.units().as_query_param().to_string()),
            ("lang", self.lang()),
            ("appid", self.config.api_key.clone()),
        ];

        debug!(url = %url, exclude = %exclude, "Fetching one-call payload");

        with_retry(&self.config.retry, || {
            let query = query
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect::<Vec<_>>();
            let url = url.clone();
            async move { self.fetch_json::<OneCallResponse>(&url, &query).await }
        })
        .await
        .into_result()
    }
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    #[instrument(skip(self), fields(city = %city))]
    async fn geocode(&self, city: &str) -> Result<GeoLocation, WeatherError> {
        let url = format!("{}/direct", self.config.geocode_url);
        let query = vec![
            ("q", city.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.config.api_key.clone()),
        ];

        debug!(url = %url, "Resolving city");

        let entries: Vec<GeocodeEntry> = with_retry(&self.config.retry, || {
            let query = query
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect::<Vec<_>>();
            let url = url.clone();
            async move { self.fetch_json(&url, &query).await }
        })
        .await
        .into_result()?;

        entries
            .first()
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))?
            .to_location()
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn get_current(&self, location: GeoLocation) -> Result<Observation, WeatherError> {
        let response = self
            .one_call(location, "minutely,hourly,daily,alerts")
            .await?;

        response
            .current
            .ok_or_else(|| WeatherError::ParseError("No current block in response".to_string()))?
            .to_observation()
    }

    #[instrument(skip(self), fields(location = %location, days = %days))]
    async fn get_daily(
        &self,
        location: GeoLocation,
        days: u8,
    ) -> Result<Vec<ForecastDay>, WeatherError> {
        let days = usize::from(days.clamp(1, 8));
        let response = self
            .one_call(location, "minutely,hourly,current,alerts")
            .await?;

        let daily = response
            .daily
            .ok_or_else(|| WeatherError::ParseError("No daily block in response".to_string()))?;

        daily
            .iter()
            .take(days)
            .map(crate::models::DailyBlock::to_forecast_day)
            .collect()
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn get_alerts(&self, location: GeoLocation) -> Result<Vec<WeatherAlert>, WeatherError> {
        let response = self
            .one_call(location, "minutely,hourly,daily,current")
            .await?;

        // Absent alerts block means no active alerts, not an error
        response
            .alerts
            .unwrap_or_default()
            .iter()
            .map(crate::models::AlertBlock::to_alert)
            .collect()
    }
}
