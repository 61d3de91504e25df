//! Dashboard service
//!
//! Orchestrates live weather, persisted history and the optional
//! prediction model into the data a dashboard front end renders.

use std::sync::Arc;

use chrono::{Duration, Utc};
use domain::aggregate::{self, WeeklyBucket};
use domain::{DomainError, ForecastDay, Observation, WeatherAlert};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{HistoryStorePort, PredictionPort, WeatherProviderPort};

/// What to do when the live fetch fails
///
/// Degraded mode is opt-in: unless configured otherwise, a provider
/// failure surfaces as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the provider error to the caller
    #[default]
    Propagate,
    /// Serve the most recent stored observation, marked stale
    FallbackToHistory,
}

/// Locally evaluated temperature thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Advisory when the temperature reaches or exceeds this value
    #[serde(default = "default_high_temp")]
    pub high_temp: f64,
    /// Advisory when the temperature drops to or below this value
    #[serde(default = "default_low_temp")]
    pub low_temp: f64,
}

const fn default_high_temp() -> f64 {
    95.0
}

const fn default_low_temp() -> f64 {
    32.0
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_temp: default_high_temp(),
            low_temp: default_low_temp(),
        }
    }
}

/// One refresh worth of dashboard data for a city
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Current (or last known) conditions
    pub observation: Observation,
    /// Daily forecast, empty when served from history
    pub forecast: Vec<ForecastDay>,
    /// Provider alerts plus locally derived threshold advisories
    pub alerts: Vec<WeatherAlert>,
    /// True when the observation came from history instead of the provider
    pub stale: bool,
}

/// History aggregated into the three dashboard views
#[derive(Debug, Clone)]
pub struct TrendReport {
    /// Most recent seven observations, oldest first
    pub daily: Vec<Observation>,
    /// Positional weekly buckets over the full series
    pub weekly: Vec<WeeklyBucket>,
    /// First thirty observations, oldest first
    pub monthly: Vec<Observation>,
}

/// Dashboard orchestration over the weather, history and prediction ports
pub struct DashboardService {
    weather: Arc<dyn WeatherProviderPort>,
    history: Arc<dyn HistoryStorePort>,
    prediction: Option<Arc<dyn PredictionPort>>,
    forecast_days: u8,
    failure_policy: FailurePolicy,
    thresholds: AlertThresholds,
}

impl DashboardService {
    /// Create a service without a prediction model
    #[must_use]
    pub fn new(
        weather: Arc<dyn WeatherProviderPort>,
        history: Arc<dyn HistoryStorePort>,
        forecast_days: u8,
        failure_policy: FailurePolicy,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            weather,
            history,
            prediction: None,
            forecast_days,
            failure_policy,
            thresholds,
        }
    }

    /// Attach a prediction model
    #[must_use]
    pub fn with_prediction(mut self, prediction: Arc<dyn PredictionPort>) -> Self {
        self.prediction = Some(prediction);
        self
    }

    /// Fetch live data for a city and persist the observation
    ///
    /// Resolves the city to coordinates once, then fetches current
    /// conditions, forecast and alerts against them. If any leg of the
    /// fetch fails, the configured [`FailurePolicy`] decides whether the
    /// error propagates or the last stored observation is served with
    /// `stale = true`. A fallback with no stored history still fails.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCityName` for a blank city name, and
    /// the provider error under `FailurePolicy::Propagate` or when no
    /// history exists to fall back on.
    #[instrument(skip(self), fields(city = %city))]
    pub async fn refresh(&self, city: &str) -> Result<DashboardSnapshot, ApplicationError> {
        if city.trim().is_empty() {
            return Err(DomainError::InvalidCityName(city.to_string()).into());
        }

        match self.fetch_live(city).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) if self.failure_policy == FailurePolicy::FallbackToHistory => {
                warn!(error = %err, "Live fetch failed, falling back to history");
                let mut recent = self.history.get_for_city(city, Some(1)).await?;
                let Some(observation) = recent.pop() else {
                    return Err(err);
                };

                let alerts = self.threshold_alerts(&observation);
                Ok(DashboardSnapshot {
                    observation,
                    forecast: Vec::new(),
                    alerts,
                    stale: true,
                })
            },
            Err(err) => Err(err),
        }
    }

    /// One full fetch cycle: geocode once, fetch, label and persist
    ///
    /// The observation is stored as soon as it arrives, so a later leg
    /// failing never loses the reading.
    async fn fetch_live(&self, city: &str) -> Result<DashboardSnapshot, ApplicationError> {
        let location = self.weather.geocode(city).await?;

        let mut observation = self.weather.get_current(location).await?;
        observation.city = city.to_string();
        self.history.upsert(&observation).await?;

        let forecast = self.weather.get_forecast(location, self.forecast_days).await?;
        let mut alerts = self.weather.get_alerts(location).await?;
        alerts.extend(self.threshold_alerts(&observation));

        Ok(DashboardSnapshot {
            observation,
            forecast,
            alerts,
            stale: false,
        })
    }

    /// Refresh several cities, preserving input order
    ///
    /// Failures are reported per city so one bad city does not take down
    /// the whole board.
    #[instrument(skip(self, cities))]
    pub async fn refresh_many(
        &self,
        cities: &[String],
    ) -> Vec<(String, Result<DashboardSnapshot, ApplicationError>)> {
        let mut results = Vec::with_capacity(cities.len());
        for city in cities {
            let result = self.refresh(city).await;
            results.push((city.clone(), result));
        }
        results
    }

    /// Aggregate stored history for a city into the dashboard trend views
    ///
    /// # Errors
    ///
    /// Returns a storage error if the history cannot be read.
    #[instrument(skip(self), fields(city = %city))]
    pub async fn trends(&self, city: &str) -> Result<TrendReport, ApplicationError> {
        let series = self.history.get_for_city(city, None).await?;
        debug!(records = series.len(), "Aggregating history");

        Ok(TrendReport {
            daily: aggregate::daily(&series).to_vec(),
            weekly: aggregate::weekly(&series),
            monthly: aggregate::monthly(&series).to_vec(),
        })
    }

    /// Predicted temperatures for the next `horizon` days
    ///
    /// Returns `None` when no model is attached or the model reports
    /// itself unavailable; other errors propagate.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the history cannot be read, or the
    /// model's error when prediction fails for a reason other than
    /// unavailability.
    #[instrument(skip(self), fields(city = %city, horizon = %horizon))]
    pub async fn predicted_series(
        &self,
        city: &str,
        horizon: u32,
    ) -> Result<Option<Vec<f64>>, ApplicationError> {
        let Some(prediction) = &self.prediction else {
            return Ok(None);
        };

        let series = self.history.get_for_city(city, None).await?;
        #[allow(clippy::cast_precision_loss)]
        let indices: Vec<f64> = (0..horizon)
            .map(|i| (series.len() as f64) + f64::from(i))
            .collect();

        match prediction.predict(&indices).await {
            Ok(values) => Ok(Some(values)),
            Err(ApplicationError::PredictionUnavailable(reason)) => {
                debug!(reason = %reason, "Prediction model unavailable");
                Ok(None)
            },
            Err(err) => Err(err),
        }
    }

    /// Locally derived threshold advisories for an observation
    #[must_use]
    pub fn threshold_alerts(&self, observation: &Observation) -> Vec<WeatherAlert> {
        let mut alerts = Vec::new();
        let now = Utc::now();
        let until = now + Duration::hours(1);

        if observation.temperature >= self.thresholds.high_temp {
            alerts.push(WeatherAlert {
                event: "High temperature".to_string(),
                start: now,
                end: until,
                description: format!(
                    "Temperature {:.1} is at or above the configured threshold {:.1}",
                    observation.temperature, self.thresholds.high_temp
                ),
                sender: "weatherdeck".to_string(),
            });
        }
        if observation.temperature <= self.thresholds.low_temp {
            alerts.push(WeatherAlert {
                event: "Low temperature".to_string(),
                start: now,
                end: until,
                description: format!(
                    "Temperature {:.1} is at or below the configured threshold {:.1}",
                    observation.temperature, self.thresholds.low_temp
                ),
                sender: "weatherdeck".to_string(),
            });
        }
        alerts
    }
}
