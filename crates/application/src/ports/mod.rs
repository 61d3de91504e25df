//! Application ports
//!
//! Interfaces the application layer depends on; adapters live in the
//! infrastructure layer.

mod history_port;
mod prediction_port;
mod weather_port;

pub use history_port::HistoryStorePort;
pub use prediction_port::PredictionPort;
pub use weather_port::WeatherProviderPort;

#[cfg(test)]
pub use history_port::MockHistoryStorePort;
#[cfg(test)]
pub use prediction_port::MockPredictionPort;
#[cfg(test)]
pub use weather_port::MockWeatherProviderPort;
