use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::{Property, VoteDirection};

/// Storage port for property records. The implementation owns all durable
/// state; the service layer keeps none.
#[async_trait]
pub trait PropertiesRepository: Send + Sync {
    /// Full collection, newest first.
    async fn list(&self) -> anyhow::Result<Vec<Property>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Property>>;

    async fn insert(&self, property: Property) -> anyhow::Result<()>;

    /// Returns false when the row is gone, so a caller racing a delete
    /// does not report success for a record that no longer exists.
    async fn update(&self, property: Property) -> anyhow::Result<bool>;

    /// Storage-level `counter = counter + 1`, returning the updated row.
    /// Must be a single statement so concurrent votes cannot lose updates.
    async fn vote(
        &self,
        id: Uuid,
        direction: VoteDirection,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Property>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Removes every row, returning how many were removed.
    async fn delete_all(&self) -> anyhow::Result<u64>;
}
