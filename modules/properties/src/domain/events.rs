use serde::Serialize;
use uuid::Uuid;

use crate::contract::Property;

/// One event per committed mutation, carrying the full resulting entity
/// (or the id, for deletions). Emitted after the storage write succeeds,
/// never before.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum PropertyEvent {
    #[serde(rename = "propertyCreated")]
    Created(Property),
    #[serde(rename = "propertyUpdated")]
    Updated(Property),
    #[serde(rename = "propertyDeleted")]
    Deleted { id: Uuid },
    #[serde(rename = "allPropertiesDeleted")]
    AllDeleted { count: u64 },
}

/// Fan-out port. Implementations must be fire-and-forget: publishing never
/// blocks the mutation path and never reports delivery.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: PropertyEvent);
}

/// Publisher for wiring paths that have no live channel (tests, `check`).
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: PropertyEvent) {}
}
