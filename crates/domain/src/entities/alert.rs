//! Severe-weather alert entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A severe-weather notice.
///
/// Ephemeral: re-fetched on every refresh, never persisted. Also used for
/// locally derived threshold advisories, in which case `sender` names the
/// application rather than a weather office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlert {
    /// Event name, e.g. "Heat Advisory"
    pub event: String,
    /// When the alert becomes active
    pub start: DateTime<Utc>,
    /// When the alert expires
    pub end: DateTime<Utc>,
    /// Free-text description
    pub description: String,
    /// Issuing source
    pub sender: String,
}

impl WeatherAlert {
    /// Whether the alert is active at the given instant
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn active_window_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
        let alert = WeatherAlert {
            event: "Heat Advisory".to_string(),
            start,
            end,
            description: "Dangerous heat".to_string(),
            sender: "NWS Miami".to_string(),
        };

        assert!(alert.is_active_at(start));
        assert!(alert.is_active_at(end));
        assert!(alert.is_active_at(Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap()));
        assert!(!alert.is_active_at(Utc.with_ymd_and_hms(2025, 6, 1, 19, 0, 0).unwrap()));
    }
}
