//! Weather adapter - implements WeatherProviderPort over integration_weather

use application::error::ApplicationError;
use application::ports::WeatherProviderPort;
use async_trait::async_trait;
use domain::{ForecastDay, GeoLocation, Observation, Units, WeatherAlert};
use integration_weather::{OpenWeatherClient, WeatherApi, WeatherConfig, WeatherError};
use tracing::{debug, instrument};

/// Adapter over the OpenWeatherMap-compatible client
pub struct WeatherAdapter {
    client: OpenWeatherClient,
}

impl std::fmt::Debug for WeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherAdapter")
            .field("client", &"OpenWeatherClient")
            .finish()
    }
}

impl WeatherAdapter {
    /// Create an adapter with the given provider configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: WeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenWeatherClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self { client })
    }

    /// Switch the unit system for subsequent requests
    pub fn set_units(&self, units: Units) {
        self.client.set_units(units);
    }

    /// Switch the description language for subsequent requests
    pub fn set_lang(&self, lang: impl Into<String>) {
        self.client.set_lang(lang);
    }

    /// Map an integration error to an application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::CityNotFound(city) => ApplicationError::CityNotFound(city),
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::Unauthorized => {
                ApplicationError::Configuration("Provider rejected the API key".to_string())
            },
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::Timeout(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::Provider(e),
            WeatherError::ParseError(e) => ApplicationError::Internal(e),
        }
    }
}

#[async_trait]
impl WeatherProviderPort for WeatherAdapter {
    #[instrument(skip(self), fields(city = %city))]
    async fn geocode(&self, city: &str) -> Result<GeoLocation, ApplicationError> {
        self.client.geocode(city).await.map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn get_current(&self, location: GeoLocation) -> Result<Observation, ApplicationError> {
        let result = self
            .client
            .get_current(location)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(obs) => debug!(temperature = obs.temperature, "Retrieved current conditions"),
            Err(e) => debug!(error = %e, "Failed to get current conditions"),
        }

        result
    }

    #[instrument(skip(self), fields(location = %location, days = %days))]
    async fn get_forecast(
        &self,
        location: GeoLocation,
        days: u8,
    ) -> Result<Vec<ForecastDay>, ApplicationError> {
        self.client
            .get_daily(location, days)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self), fields(location = %location))]
    async fn get_alerts(&self, location: GeoLocation) -> Result<Vec<WeatherAlert>, ApplicationError> {
        self.client
            .get_alerts(location)
            .await
            .map_err(Self::map_error)
    }
}
