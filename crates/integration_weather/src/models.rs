//! Provider wire formats
//!
//! Raw response shapes for the geocoding and one-call endpoints, plus the
//! conversions into domain types. Fields the provider may omit are modeled
//! as `Option` or defaulted so a sparse payload still parses.

use chrono::{DateTime, TimeZone, Utc};
use domain::{ForecastDay, GeoLocation, Observation, WeatherAlert};
use serde::Deserialize;

use crate::client::WeatherError;

/// One entry from the geocoding endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeEntry {
    /// Resolved place name
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// ISO country code
    #[serde(default)]
    pub country: String,
    /// Subdivision, where reported
    #[serde(default)]
    pub state: Option<String>,
}

impl GeocodeEntry {
    /// Convert into a validated location
    pub fn to_location(&self) -> Result<GeoLocation, WeatherError> {
        GeoLocation::new(self.lat, self.lon)
            .map_err(|e| WeatherError::ParseError(format!("Geocoder returned bad coordinates: {e}")))
    }
}

/// Weather condition descriptor nested in every block
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    /// Human-readable description, e.g. "scattered clouds"
    #[serde(default)]
    pub description: String,
    /// Provider icon code, e.g. "03d"
    #[serde(default)]
    pub icon: String,
}

/// Precipitation volume block (`{"1h": 0.25}`)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PrecipVolume {
    /// Volume over the last hour, mm
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
}

/// Current conditions block of the one-call response
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBlock {
    /// Observation time, unix seconds
    pub dt: i64,
    /// Temperature in the requested units
    pub temp: f64,
    /// Apparent temperature
    #[serde(default)]
    pub feels_like: Option<f64>,
    /// Relative humidity percent
    pub humidity: f64,
    /// UV index
    #[serde(default)]
    pub uvi: Option<f64>,
    /// Condition descriptors, first entry is primary
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    /// Rain volume, when raining
    #[serde(default)]
    pub rain: Option<PrecipVolume>,
    /// Snow volume, when snowing
    #[serde(default)]
    pub snow: Option<PrecipVolume>,
}

/// Per-day temperature block
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DailyTemp {
    /// Daily minimum
    pub min: f64,
    /// Daily maximum
    pub max: f64,
}

/// One day of the daily forecast block
#[derive(Debug, Clone, Deserialize)]
pub struct DailyBlock {
    /// Forecast day, unix seconds
    pub dt: i64,
    /// Sunrise, unix seconds
    #[serde(default)]
    pub sunrise: Option<i64>,
    /// Sunset, unix seconds
    #[serde(default)]
    pub sunset: Option<i64>,
    /// Temperature range
    pub temp: DailyTemp,
    /// Probability of precipitation (0.0-1.0)
    #[serde(default)]
    pub pop: f64,
    /// Condition descriptors
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
}

/// One severe-weather alert from the one-call response
#[derive(Debug, Clone, Deserialize)]
pub struct AlertBlock {
    /// Issuing source
    #[serde(default)]
    pub sender_name: String,
    /// Event name
    pub event: String,
    /// Active from, unix seconds
    pub start: i64,
    /// Active until, unix seconds
    pub end: i64,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// Top-level one-call response
#[derive(Debug, Clone, Deserialize)]
pub struct OneCallResponse {
    /// Current conditions, absent when excluded
    #[serde(default)]
    pub current: Option<CurrentBlock>,
    /// Daily forecast, absent when excluded
    #[serde(default)]
    pub daily: Option<Vec<DailyBlock>>,
    /// Active alerts, absent when none
    #[serde(default)]
    pub alerts: Option<Vec<AlertBlock>>,
}

fn unix_to_utc(secs: i64) -> Result<DateTime<Utc>, WeatherError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| WeatherError::ParseError(format!("Invalid unix timestamp: {secs}")))
}

fn primary_condition(weather: &[ConditionEntry]) -> (String, String) {
    weather
        .first()
        .map_or_else(|| (String::new(), String::new()), |c| {
            (c.description.clone(), c.icon.clone())
        })
}

impl CurrentBlock {
    /// Normalize into a domain observation
    ///
    /// The provider reports conditions per coordinate, so the observation's
    /// city is left empty; the caller labels it with the name the location
    /// was resolved from.
    pub fn to_observation(&self) -> Result<Observation, WeatherError> {
        let observed_at = unix_to_utc(self.dt)?;
        let date = observed_at.date_naive();
        let (description, icon) = primary_condition(&self.weather);
        let precipitation = self.rain.unwrap_or_default().one_hour
            + self.snow.unwrap_or_default().one_hour;

        let mut obs = Observation::new(String::new(), date, observed_at, self.temp, self.humidity, precipitation)
            .with_description(description)
            .with_icon(icon);
        if let Some(feels_like) = self.feels_like {
            obs = obs.with_feels_like(feels_like);
        }
        if let Some(uvi) = self.uvi {
            obs = obs.with_uv_index(uvi);
        }
        Ok(obs)
    }
}

impl DailyBlock {
    /// Normalize into a domain forecast day
    pub fn to_forecast_day(&self) -> Result<ForecastDay, WeatherError> {
        let date = unix_to_utc(self.dt)?.date_naive();
        let (description, icon) = primary_condition(&self.weather);
        Ok(ForecastDay {
            date,
            high: self.temp.max,
            low: self.temp.min,
            precipitation_probability: self.pop,
            description,
            icon,
            sunrise: self.sunrise.map(unix_to_utc).transpose()?,
            sunset: self.sunset.map(unix_to_utc).transpose()?,
        })
    }
}

impl AlertBlock {
    /// Normalize into a domain alert
    pub fn to_alert(&self) -> Result<WeatherAlert, WeatherError> {
        Ok(WeatherAlert {
            event: self.event.clone(),
            start: unix_to_utc(self.start)?,
            end: unix_to_utc(self.end)?,
            description: self.description.clone(),
            sender: self.sender_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONECALL_SAMPLE: &str = r#"{
        "lat": 25.7617,
        "lon": -80.1918,
        "timezone": "America/New_York",
        "current": {
            "dt": 1748790000,
            "temp": 88.4,
            "feels_like": 94.1,
            "humidity": 70,
            "uvi": 8.0,
            "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
            "rain": {"1h": 0.25}
        },
        "daily": [
            {
                "dt": 1748790000,
                "sunrise": 1748770000,
                "sunset": 1748820000,
                "temp": {"min": 75.2, "max": 90.1, "day": 86.0},
                "pop": 0.4,
                "weather": [{"description": "light rain", "icon": "10d"}]
            }
        ],
        "alerts": [
            {
                "sender_name": "NWS Miami",
                "event": "Heat Advisory",
                "start": 1748790000,
                "end": 1748820000,
                "description": "Dangerous heat expected"
            }
        ]
    }"#;

    #[test]
    fn parses_full_onecall_payload() {
        let resp: OneCallResponse = serde_json::from_str(ONECALL_SAMPLE).expect("should parse");
        assert!(resp.current.is_some());
        assert_eq!(resp.daily.as_ref().map(Vec::len), Some(1));
        assert_eq!(resp.alerts.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn current_block_normalizes() {
        let resp: OneCallResponse = serde_json::from_str(ONECALL_SAMPLE).expect("should parse");
        let obs = resp
            .current
            .expect("current present")
            .to_observation()
            .expect("should normalize");

        assert!(obs.city.is_empty());
        assert!((obs.temperature - 88.4).abs() < f64::EPSILON);
        assert!((obs.humidity - 70.0).abs() < f64::EPSILON);
        assert!((obs.precipitation - 0.25).abs() < f64::EPSILON);
        assert_eq!(obs.description, "scattered clouds");
        assert_eq!(obs.icon, "03d");
        assert_eq!(obs.feels_like, Some(94.1));
        assert_eq!(obs.uv_index, Some(8.0));
    }

    #[test]
    fn daily_block_normalizes() {
        let resp: OneCallResponse = serde_json::from_str(ONECALL_SAMPLE).expect("should parse");
        let day = resp.daily.expect("daily present")[0]
            .to_forecast_day()
            .expect("should normalize");

        assert!((day.high - 90.1).abs() < f64::EPSILON);
        assert!((day.low - 75.2).abs() < f64::EPSILON);
        assert!((day.precipitation_probability - 0.4).abs() < f64::EPSILON);
        assert_eq!(day.description, "light rain");
        assert!(day.sunrise.is_some());
        assert!(day.sunset.is_some());
    }

    #[test]
    fn alert_block_normalizes() {
        let resp: OneCallResponse = serde_json::from_str(ONECALL_SAMPLE).expect("should parse");
        let alert = resp.alerts.expect("alerts present")[0]
            .to_alert()
            .expect("should normalize");

        assert_eq!(alert.event, "Heat Advisory");
        assert_eq!(alert.sender, "NWS Miami");
        assert!(alert.start < alert.end);
    }

    #[test]
    fn sparse_current_block_parses() {
        let json = r#"{"current": {"dt": 1748790000, "temp": 70.0, "humidity": 50}}"#;
        let resp: OneCallResponse = serde_json::from_str(json).expect("should parse");
        let obs = resp
            .current
            .expect("current present")
            .to_observation()
            .expect("should normalize");

        assert!(obs.description.is_empty());
        assert!((obs.precipitation - 0.0).abs() < f64::EPSILON);
        assert!(obs.feels_like.is_none());
    }

    #[test]
    fn geocode_entry_to_location() {
        let json = r#"[{"name": "Miami", "lat": 25.7617, "lon": -80.1918, "country": "US", "state": "Florida"}]"#;
        let entries: Vec<GeocodeEntry> = serde_json::from_str(json).expect("should parse");
        let loc = entries[0].to_location().expect("valid coordinates");
        assert!((loc.latitude() - 25.7617).abs() < f64::EPSILON);
        assert!((loc.longitude() - (-80.1918)).abs() < f64::EPSILON);
    }

    #[test]
    fn geocode_entry_bad_coordinates_rejected() {
        let entry = GeocodeEntry {
            name: "Nowhere".to_string(),
            lat: 120.0,
            lon: 0.0,
            country: String::new(),
            state: None,
        };
        assert!(entry.to_location().is_err());
    }
}
