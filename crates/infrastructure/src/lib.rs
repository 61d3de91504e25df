//! Infrastructure layer
//!
//! Configuration loading, logging setup, SQLite persistence and the
//! adapters that implement the application ports.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::{LinearPredictionAdapter, WeatherAdapter};
pub use config::{AppConfig, DatabaseConfig};
pub use persistence::{ConnectionPool, SqliteHistoryStore, create_pool};
pub use telemetry::init_tracing;
