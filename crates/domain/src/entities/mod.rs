//! Domain entities

mod alert;
mod forecast;
mod observation;

pub use alert::WeatherAlert;
pub use forecast::ForecastDay;
pub use observation::Observation;
