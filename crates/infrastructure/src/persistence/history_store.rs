//! SQLite-based weather history persistence
//!
//! One row per city and calendar day. Writing an existing key overwrites
//! the row, so repeated refreshes on the same day never duplicate history.

use std::sync::Arc;

use application::{error::ApplicationError, ports::HistoryStorePort};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::{DomainError, Observation};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::connection::{ConnectionPool, DatabaseError};

/// Columns of the history table, in declaration order.
///
/// `ensure_schema` compares the live table against this set and rebuilds
/// the table from scratch on any mismatch. Weather history is re-fetchable
/// data, so a rebuild loses nothing irreplaceable.
const EXPECTED_COLUMNS: &[&str] = &[
    "city",
    "date",
    "observed_at",
    "temperature",
    "humidity",
    "precipitation",
    "description",
    "icon",
    "feels_like",
    "uv_index",
];

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE weather_history (
        city TEXT NOT NULL,
        date TEXT NOT NULL,
        observed_at TEXT NOT NULL,
        temperature REAL NOT NULL,
        humidity REAL NOT NULL,
        precipitation REAL NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        icon TEXT NOT NULL DEFAULT '',
        feels_like REAL,
        uv_index REAL,
        PRIMARY KEY (city, date)
    );
    CREATE INDEX idx_weather_history_city ON weather_history (LOWER(city), date);
";

/// SQLite-based history store
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteHistoryStore {
    /// Create a store and bring the schema up to the expected shape
    ///
    /// # Errors
    ///
    /// Returns an error when the schema cannot be inspected or created.
    pub fn new(pool: Arc<ConnectionPool>) -> Result<Self, DatabaseError> {
        {
            let conn = pool.get()?;
            ensure_schema(&conn)?;
        }
        Ok(Self { pool })
    }
}

/// Create the history table, rebuilding it when the live columns differ
/// from the expected set.
fn ensure_schema(conn: &Connection) -> Result<(), DatabaseError> {
    let mut stmt = conn.prepare("PRAGMA table_info(weather_history)")?;
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .filter_map(Result::ok)
        .collect();

    if columns.is_empty() {
        conn.execute_batch(CREATE_TABLE_SQL)?;
        debug!("Created weather_history table");
        return Ok(());
    }

    if columns != EXPECTED_COLUMNS {
        warn!(
            found = ?columns,
            expected = ?EXPECTED_COLUMNS,
            "weather_history schema mismatch, dropping and recreating (stored history is lost)"
        );
        conn.execute_batch("DROP TABLE weather_history;")?;
        conn.execute_batch(CREATE_TABLE_SQL)?;
    }

    Ok(())
}

#[async_trait]
impl HistoryStorePort for SqliteHistoryStore {
    #[instrument(skip(self, observation), fields(city = %observation.city, date = %observation.date))]
    async fn upsert(&self, observation: &Observation) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let observation = observation.clone();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            conn.execute(
                "INSERT INTO weather_history (
                    city, date, observed_at, temperature, humidity,
                    precipitation, description, icon, feels_like, uv_index
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT(city, date) DO UPDATE SET
                    observed_at = excluded.observed_at,
                    temperature = excluded.temperature,
                    humidity = excluded.humidity,
                    precipitation = excluded.precipitation,
                    description = excluded.description,
                    icon = excluded.icon,
                    feels_like = excluded.feels_like,
                    uv_index = excluded.uv_index",
                params![
                    observation.city,
                    observation.date.to_string(),
                    observation.observed_at.to_rfc3339(),
                    observation.temperature,
                    observation.humidity,
                    observation.precipitation,
                    observation.description,
                    observation.icon,
                    observation.feels_like,
                    observation.uv_index,
                ],
            )
            .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            debug!("Stored observation");
            Ok(())
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(limit = %limit))]
    async fn get_window(&self, limit: u32) -> Result<Vec<Observation>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let mut stmt = conn
                .prepare(
                    "SELECT city, date, observed_at, temperature, humidity,
                        precipitation, description, icon, feels_like, uv_index
                     FROM weather_history
                     ORDER BY date DESC
                     LIMIT ?1",
                )
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let mut rows: Vec<Observation> = stmt
                .query_map(params![limit], row_to_observation)
                .map_err(|e| ApplicationError::Storage(e.to_string()))?
                .collect::<rusqlite::Result<_>>()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            // Fetched newest-first for the LIMIT, served oldest-first
            rows.reverse();
            Ok(rows)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(city = %city, limit = ?limit))]
    async fn get_for_city(
        &self,
        city: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Observation>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let city = city.to_string();

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            // With a limit, the most recent rows win; the result is always
            // served oldest-first
            let mut stmt = conn
                .prepare(
                    "SELECT city, date, observed_at, temperature, humidity,
                        precipitation, description, icon, feels_like, uv_index
                     FROM weather_history
                     WHERE LOWER(city) = LOWER(?1)
                     ORDER BY date DESC
                     LIMIT ?2",
                )
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            let limit = limit.map_or(-1i64, i64::from);
            let mut rows: Vec<Observation> = stmt
                .query_map(params![city, limit], row_to_observation)
                .map_err(|e| ApplicationError::Storage(e.to_string()))?
                .collect::<rusqlite::Result<_>>()
                .map_err(|e| ApplicationError::Storage(e.to_string()))?;

            rows.reverse();
            debug!(count = rows.len(), "Fetched history");
            Ok(rows)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Convert a database row to an observation
///
/// Unparseable date columns surface as errors rather than being patched
/// over; a corrupt row is a real defect the caller should see.
fn row_to_observation(row: &Row<'_>) -> rusqlite::Result<Observation> {
    let city: String = row.get(0)?;
    let date_str: String = row.get(1)?;
    let observed_at_str: String = row.get(2)?;
    let temperature: f64 = row.get(3)?;
    let humidity: f64 = row.get(4)?;
    let precipitation: f64 = row.get(5)?;
    let description: String = row.get(6)?;
    let icon: String = row.get(7)?;
    let feels_like: Option<f64> = row.get(8)?;
    let uv_index: Option<f64> = row.get(9)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            Box::new(DomainError::InvalidDateTime(format!("{date_str}: {e}"))),
        )
    })?;
    let observed_at = DateTime::parse_from_rfc3339(&observed_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                Box::new(DomainError::InvalidDateTime(format!("{observed_at_str}: {e}"))),
            )
        })?;

    let mut obs = Observation::new(city, date, observed_at, temperature, humidity, precipitation)
        .with_description(description)
        .with_icon(icon);
    if let Some(feels_like) = feels_like {
        obs = obs.with_feels_like(feels_like);
    }
    if let Some(uv_index) = uv_index {
        obs = obs.with_uv_index(uv_index);
    }
    Ok(obs)
}
