//! Unit system selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system sent with every provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Fahrenheit, miles per hour
    #[default]
    Imperial,
    /// Celsius, meters per second
    Metric,
}

impl Units {
    /// Value used for the provider's `units` query parameter
    #[must_use]
    pub const fn as_query_param(&self) -> &'static str {
        match self {
            Self::Imperial => "imperial",
            Self::Metric => "metric",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query_param())
    }
}

impl std::str::FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "imperial" => Ok(Self::Imperial),
            "metric" => Ok(Self::Metric),
            _ => Err(format!("Invalid unit system: {s}. Use 'imperial' or 'metric'")),
        }
    }
}
