//! Daily forecast entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single day within a multi-day forecast.
///
/// Ephemeral: not persisted unless explicitly promoted into history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Forecast date
    pub date: NaiveDate,
    /// Daily high temperature, full precision
    pub high: f64,
    /// Daily low temperature, full precision
    pub low: f64,
    /// Precipitation probability (0.0-1.0)
    pub precipitation_probability: f64,
    /// Short weather description
    pub description: String,
    /// Provider icon code
    pub icon: String,
    /// Sunrise time, if reported
    pub sunrise: Option<DateTime<Utc>>,
    /// Sunset time, if reported
    pub sunset: Option<DateTime<Utc>>,
}

impl ForecastDay {
    /// High temperature rounded to the nearest integer.
    ///
    /// Rounding happens here, at the presentation boundary, so stored and
    /// aggregated values keep full precision.
    #[must_use]
    pub fn rounded_high(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.high.round() as i64
        }
    }

    /// Low temperature rounded to the nearest integer
    #[must_use]
    pub fn rounded_low(&self) -> i64 {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.low.round() as i64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(high: f64, low: f64) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            high,
            low,
            precipitation_probability: 0.4,
            description: "light rain".to_string(),
            icon: "10d".to_string(),
            sunrise: None,
            sunset: None,
        }
    }

    #[test]
    fn rounding_is_nearest_integer() {
        assert_eq!(day(88.5, 71.4).rounded_high(), 89);
        assert_eq!(day(88.5, 71.4).rounded_low(), 71);
        assert_eq!(day(-0.6, -10.5).rounded_high(), -1);
    }

    #[test]
    fn rounding_does_not_mutate() {
        let d = day(88.5, 71.4);
        let _ = d.rounded_high();
        assert!((d.high - 88.5).abs() < f64::EPSILON);
    }
}
