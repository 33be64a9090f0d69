use std::sync::Arc;

use accounts::{Claims, Role};
use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::contract::{NewProperty, Property, PropertyPatch, VoteDirection};
use crate::domain::error::PropertiesError;
use crate::domain::events::{EventPublisher, PropertyEvent};
use crate::domain::repo::PropertiesRepository;

const DEFAULT_ZONING: &str = "unknown";

/// Domain service for the shared pin board. Events are published only after
/// the corresponding storage write committed, in commit order, and the
/// publish itself never blocks or fails the mutation.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn PropertiesRepository>,
    events: Arc<dyn EventPublisher>,
}

impl Service {
    pub fn new(repo: Arc<dyn PropertiesRepository>, events: Arc<dyn EventPublisher>) -> Self {
        Self { repo, events }
    }

    /// Snapshot of the full collection, newest first. Public read.
    pub async fn list(&self) -> Result<Vec<Property>, PropertiesError> {
        self.repo
            .list()
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))
    }

    pub async fn get(&self, id: Uuid) -> Result<Property, PropertiesError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))?
            .ok_or(PropertiesError::NotFound { id })
    }

    /// Create a pin, stamping the creator from the actor's claims. The
    /// display-name snapshot is immutable afterwards.
    #[instrument(name = "properties.service.create", skip(self, input, actor), fields(actor_id = %actor.sub))]
    pub async fn create(
        &self,
        input: NewProperty,
        actor: &Claims,
    ) -> Result<Property, PropertiesError> {
        if input.address.trim().is_empty() {
            return Err(PropertiesError::validation(
                "address",
                "address is required",
            ));
        }

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            address: input.address,
            zoning: input.zoning.unwrap_or_else(|| DEFAULT_ZONING.to_string()),
            value: input.value.unwrap_or(0.0),
            notes: input.notes.unwrap_or_default(),
            tax_value: input.tax_value,
            cap_rate: input.cap_rate,
            monthly_payment: input.monthly_payment,
            coordinates: input.coordinates,
            thumbs_up: 0,
            thumbs_down: 0,
            creator_id: Some(actor.sub),
            creator_name: Some(actor.name.clone()),
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(property.clone())
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))?;

        info!(property_id = %property.id, "created property");
        self.events.publish(PropertyEvent::Created(property.clone()));
        Ok(property)
    }

    /// Partial update, last-writer-wins: no version check, the incoming
    /// fields unconditionally overwrite. Applying the same patch twice
    /// yields the same final state.
    #[instrument(name = "properties.service.update", skip(self, patch), fields(property_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        patch: PropertyPatch,
    ) -> Result<Property, PropertiesError> {
        let mut current = self.get(id).await?;

        if let Some(address) = patch.address {
            if address.trim().is_empty() {
                return Err(PropertiesError::validation(
                    "address",
                    "address cannot be empty",
                ));
            }
            current.address = address;
        }
        if let Some(zoning) = patch.zoning {
            current.zoning = zoning;
        }
        if let Some(value) = patch.value {
            current.value = value;
        }
        if let Some(notes) = patch.notes {
            current.notes = notes;
        }
        if let Some(tax_value) = patch.tax_value {
            current.tax_value = Some(tax_value);
        }
        if let Some(cap_rate) = patch.cap_rate {
            current.cap_rate = Some(cap_rate);
        }
        if let Some(monthly_payment) = patch.monthly_payment {
            current.monthly_payment = Some(monthly_payment);
        }
        if let Some(coordinates) = patch.coordinates {
            current.coordinates = Some(coordinates);
        }
        current.updated_at = Utc::now();

        // The row can vanish between the fetch above and this write; a
        // missed update must not be announced as one, or subscribers would
        // resurrect the record in their caches.
        let existed = self
            .repo
            .update(current.clone())
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))?;
        if !existed {
            return Err(PropertiesError::NotFound { id });
        }

        info!("updated property");
        self.events.publish(PropertyEvent::Updated(current.clone()));
        Ok(current)
    }

    /// Bump one counter through the storage-level atomic increment.
    /// Deliberately non-idempotent: every call counts.
    #[instrument(name = "properties.service.vote", skip(self), fields(property_id = %id, direction = ?direction))]
    pub async fn vote(
        &self,
        id: Uuid,
        direction: VoteDirection,
    ) -> Result<Property, PropertiesError> {
        let updated = self
            .repo
            .vote(id, direction, Utc::now())
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))?
            .ok_or(PropertiesError::NotFound { id })?;

        self.events.publish(PropertyEvent::Updated(updated.clone()));
        Ok(updated)
    }

    #[instrument(name = "properties.service.delete", skip(self, actor), fields(property_id = %id))]
    pub async fn delete(&self, id: Uuid, actor: &Claims) -> Result<(), PropertiesError> {
        require_admin(actor)?;

        let removed = self
            .repo
            .delete(id)
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))?;
        if !removed {
            return Err(PropertiesError::NotFound { id });
        }

        info!("deleted property");
        self.events.publish(PropertyEvent::Deleted { id });
        Ok(())
    }

    /// Full-collection reset. The only sanctioned way counters go down.
    #[instrument(name = "properties.service.delete_all", skip(self, actor))]
    pub async fn delete_all(&self, actor: &Claims) -> Result<u64, PropertiesError> {
        require_admin(actor)?;

        let count = self
            .repo
            .delete_all()
            .await
            .map_err(|e| PropertiesError::database(e.to_string()))?;

        info!(count, "deleted all properties");
        self.events.publish(PropertyEvent::AllDeleted { count });
        Ok(count)
    }
}

fn require_admin(actor: &Claims) -> Result<(), PropertiesError> {
    if actor.role.satisfies(Role::Admin) {
        Ok(())
    } else {
        Err(PropertiesError::Forbidden {
            required: Role::Admin,
        })
    }
}
