use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::FeatureRequest;

#[async_trait]
pub trait FeatureRequestsRepository: Send + Sync {
    /// Full collection, newest first.
    async fn list(&self) -> anyhow::Result<Vec<FeatureRequest>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FeatureRequest>>;

    async fn insert(&self, request: FeatureRequest) -> anyhow::Result<()>;

    async fn update(&self, request: FeatureRequest) -> anyhow::Result<()>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
