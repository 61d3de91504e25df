//! SQLite persistence

pub mod connection;
mod history_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use history_store::SqliteHistoryStore;
