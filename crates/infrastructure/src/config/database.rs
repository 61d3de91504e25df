//! Database configuration

use serde::{Deserialize, Serialize};

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path, or ":memory:" for an in-memory database
    #[serde(default = "default_path")]
    pub path: String,

    /// Maximum pooled connections (default: 5)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_path() -> String {
    "weatherdeck.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_connections: default_max_connections(),
        }
    }
}
