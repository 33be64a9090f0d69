//! Client-side view of the pin board.
//!
//! The cache is always subordinate to server state: a (re)connect replaces
//! it wholesale from a snapshot, and incremental events merge by id only.
//! Timestamps are never consulted to prefer one concurrent edit over
//! another; whatever arrives last wins, matching the server's policy.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::Property;
use crate::domain::events::PropertyEvent;

/// Where a full snapshot comes from. In-process wiring hands the domain
/// service straight in; a remote client would put an HTTP fetch behind this.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn snapshot(&self) -> anyhow::Result<Vec<Property>>;
}

#[derive(Default)]
pub struct PropertyCache {
    entries: HashMap<Uuid, Property>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache from a fresh snapshot. Used on first connect and
    /// after every reconnect; events missed while disconnected are simply
    /// superseded.
    pub async fn resync(&mut self, source: &dyn SnapshotSource) -> anyhow::Result<()> {
        let snapshot = source.snapshot().await?;
        self.entries = snapshot.into_iter().map(|p| (p.id, p)).collect();
        Ok(())
    }

    /// Merge one broadcast event. Upsert on create/update, remove on delete,
    /// clear on reset. Unknown ids on update are upserted too: the entity is
    /// complete in the event, so there is nothing to wait for.
    pub fn apply(&mut self, event: PropertyEvent) {
        match event {
            PropertyEvent::Created(p) | PropertyEvent::Updated(p) => {
                self.entries.insert(p.id, p);
            }
            PropertyEvent::Deleted { id } => {
                self.entries.remove(&id);
            }
            PropertyEvent::AllDeleted { .. } => {
                self.entries.clear();
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Property> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current view, newest first, matching the server's list order.
    pub fn properties(&self) -> Vec<&Property> {
        let mut all: Vec<&Property> = self.entries.values().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(address: &str) -> Property {
        Property {
            id: Uuid::new_v4(),
            address: address.into(),
            zoning: "unknown".into(),
            value: 0.0,
            notes: String::new(),
            tax_value: None,
            cap_rate: None,
            monthly_payment: None,
            coordinates: None,
            thumbs_up: 0,
            thumbs_down: 0,
            creator_id: None,
            creator_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    struct FixedSource(Vec<Property>);

    #[async_trait]
    impl SnapshotSource for FixedSource {
        async fn snapshot(&self) -> anyhow::Result<Vec<Property>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn resync_replaces_rather_than_merges() {
        let stale = sample("stale");
        let fresh = sample("fresh");

        let mut cache = PropertyCache::new();
        cache.apply(PropertyEvent::Created(stale.clone()));

        cache
            .resync(&FixedSource(vec![fresh.clone()]))
            .await
            .unwrap();

        assert!(cache.get(stale.id).is_none());
        assert_eq!(cache.get(fresh.id).unwrap().address, "fresh");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn events_merge_by_id() {
        let mut cache = PropertyCache::new();
        let mut p = sample("one");
        cache.apply(PropertyEvent::Created(p.clone()));

        p.notes = "renovated".into();
        cache.apply(PropertyEvent::Updated(p.clone()));
        assert_eq!(cache.get(p.id).unwrap().notes, "renovated");
        assert_eq!(cache.len(), 1);

        cache.apply(PropertyEvent::Deleted { id: p.id });
        assert!(cache.is_empty());
    }

    #[test]
    fn update_for_an_unseen_id_is_an_upsert() {
        let mut cache = PropertyCache::new();
        let p = sample("late arrival");
        cache.apply(PropertyEvent::Updated(p.clone()));
        assert!(cache.get(p.id).is_some());
    }

    #[test]
    fn reset_clears_everything() {
        let mut cache = PropertyCache::new();
        cache.apply(PropertyEvent::Created(sample("a")));
        cache.apply(PropertyEvent::Created(sample("b")));
        cache.apply(PropertyEvent::AllDeleted { count: 2 });
        assert!(cache.is_empty());
    }
}
