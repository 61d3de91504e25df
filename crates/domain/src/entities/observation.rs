//! Weather observation entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One weather snapshot for a city at a point in time.
///
/// `city` + `date` form the natural key: re-inserting the same key must
/// overwrite the stored row, never duplicate it. Temperature is kept at
/// full precision; rounding for display is the presentation layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// City the observation belongs to (as entered by the user)
    pub city: String,
    /// Calendar day of the observation (natural key together with `city`)
    pub date: NaiveDate,
    /// Exact observation time
    pub observed_at: DateTime<Utc>,
    /// Temperature in the configured unit system
    pub temperature: f64,
    /// Relative humidity in percent (0-100)
    pub humidity: f64,
    /// Precipitation amount (mm) or probability, provider dependent
    pub precipitation: f64,
    /// Short weather description
    pub description: String,
    /// Provider icon code
    pub icon: String,
    /// Apparent (feels like) temperature, if reported
    pub feels_like: Option<f64>,
    /// UV index, if reported
    pub uv_index: Option<f64>,
}

impl Observation {
    /// Create an observation with the required fields
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        date: NaiveDate,
        observed_at: DateTime<Utc>,
        temperature: f64,
        humidity: f64,
        precipitation: f64,
    ) -> Self {
        Self {
            city: city.into(),
            date,
            observed_at,
            temperature,
            humidity,
            precipitation,
            description: String::new(),
            icon: String::new(),
            feels_like: None,
            uv_index: None,
        }
    }

    /// Set the weather description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the provider icon code
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the apparent temperature
    #[must_use]
    pub const fn with_feels_like(mut self, feels_like: f64) -> Self {
        self.feels_like = Some(feels_like);
        self
    }

    /// Set the UV index
    #[must_use]
    pub const fn with_uv_index(mut self, uv_index: f64) -> Self {
        self.uv_index = Some(uv_index);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Observation {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap();
        Observation::new("Miami", date, at, 88.4, 70.0, 0.2)
            .with_description("scattered clouds")
            .with_icon("03d")
            .with_feels_like(94.1)
            .with_uv_index(8.0)
    }

    #[test]
    fn builder_sets_optional_fields() {
        let obs = sample();
        assert_eq!(obs.city, "Miami");
        assert_eq!(obs.description, "scattered clouds");
        assert_eq!(obs.icon, "03d");
        assert_eq!(obs.feels_like, Some(94.1));
        assert_eq!(obs.uv_index, Some(8.0));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap();
        let obs = Observation::new("Miami", date, at, 88.4, 70.0, 0.0);
        assert!(obs.feels_like.is_none());
        assert!(obs.uv_index.is_none());
        assert!(obs.description.is_empty());
    }

    #[test]
    fn serde_roundtrip_preserves_precision() {
        let obs = sample();
        let json = serde_json::to_string(&obs).expect("serialize");
        let back: Observation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(obs, back);
        assert!((back.temperature - 88.4).abs() < f64::EPSILON);
    }
}
