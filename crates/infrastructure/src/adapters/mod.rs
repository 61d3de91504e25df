//! Port adapters
//!
//! Implementations of the application ports over the integration
//! clients and local files.

mod prediction_adapter;
mod weather_adapter;

pub use prediction_adapter::LinearPredictionAdapter;
pub use weather_adapter::WeatherAdapter;
