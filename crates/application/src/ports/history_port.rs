//! Weather history store port

use async_trait::async_trait;
use domain::Observation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisted weather history
///
/// Implementations must treat `city` + `date` as the natural key: storing
/// an observation with an existing key overwrites the previous row.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HistoryStorePort: Send + Sync {
    /// Insert or overwrite the observation for its city and date
    async fn upsert(&self, observation: &Observation) -> Result<(), ApplicationError>;

    /// The most recent `limit` observations across all cities, oldest first
    async fn get_window(&self, limit: u32) -> Result<Vec<Observation>, ApplicationError>;

    /// Observations for a city, oldest first
    ///
    /// City matching is case-insensitive. With `Some(limit)` only the most
    /// recent `limit` rows are returned, still oldest first; `None` returns
    /// the full series.
    async fn get_for_city(
        &self,
        city: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Observation>, ApplicationError>;
}
