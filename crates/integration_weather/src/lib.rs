//! OpenWeatherMap weather integration
//!
//! Client for OpenWeatherMap-compatible services: geocoding, current
//! conditions, daily forecasts and severe-weather alerts, with retry and
//! exponential backoff on transient failures.

pub mod client;
mod models;
pub mod retry;

pub use client::{OpenWeatherClient, WeatherApi, WeatherConfig, WeatherError};
pub use models::{AlertBlock, CurrentBlock, DailyBlock, GeocodeEntry, OneCallResponse};
pub use retry::{Retryable, RetryConfig, RetryResult, retry, with_retry};
