use async_trait::async_trait;

use crate::contract::FeatureRequest;

/// Outbound notification port. Mail is an external collaborator: delivery
/// failure must never fail or delay the request that triggered it, so the
/// service invokes this off the response path and only logs errors.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn notify_new_request(&self, request: &FeatureRequest) -> anyhow::Result<()>;
}

/// Mailer for deployments without mail configured.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn notify_new_request(&self, _request: &FeatureRequest) -> anyhow::Result<()> {
        Ok(())
    }
}
