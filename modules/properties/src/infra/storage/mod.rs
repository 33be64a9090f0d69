pub mod entity;
pub mod mapper;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::AnyPool;
use uuid::Uuid;

use crate::contract::{Property, VoteDirection};
use crate::domain::repo::PropertiesRepository;

/// Idempotent schema setup with portable DDL.
pub async fn ensure_schema(pool: &AnyPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS properties (
            id              TEXT PRIMARY KEY,
            address         TEXT NOT NULL,
            zoning          TEXT NOT NULL,
            value           REAL NOT NULL,
            notes           TEXT NOT NULL,
            tax_value       REAL,
            cap_rate        REAL,
            monthly_payment REAL,
            coordinates     TEXT,
            thumbs_up       INTEGER NOT NULL DEFAULT 0,
            thumbs_down     INTEGER NOT NULL DEFAULT 0,
            creator_id      TEXT,
            creator_name    TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// sqlx-backed repository; one implementation for both engines.
pub struct SqlPropertiesRepository {
    pool: AnyPool,
}

impl SqlPropertiesRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertiesRepository for SqlPropertiesRepository {
    async fn list(&self) -> anyhow::Result<Vec<Property>> {
        let rows = entity::list(&self.pool).await?;
        rows.into_iter().map(mapper::row_to_property).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Property>> {
        let row = entity::find_by_id(&self.pool, &id.to_string()).await?;
        row.map(mapper::row_to_property).transpose()
    }

    async fn insert(&self, property: Property) -> anyhow::Result<()> {
        entity::insert(&self.pool, mapper::property_to_row(&property)?).await
    }

    async fn update(&self, property: Property) -> anyhow::Result<bool> {
        entity::update(&self.pool, mapper::property_to_row(&property)?).await
    }

    async fn vote(
        &self,
        id: Uuid,
        direction: VoteDirection,
        at: DateTime<Utc>,
    ) -> anyhow::Result<Option<Property>> {
        let column = match direction {
            VoteDirection::Up => "thumbs_up",
            VoteDirection::Down => "thumbs_down",
        };
        let row =
            entity::bump_counter(&self.pool, &id.to_string(), column, &db::time::encode_ts(at))
                .await?;
        row.map(mapper::row_to_property).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        entity::delete(&self.pool, &id.to_string()).await
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        entity::delete_all(&self.pool).await
    }
}
