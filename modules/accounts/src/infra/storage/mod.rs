pub mod entity;
pub mod mapper;

use async_trait::async_trait;
use sqlx::AnyPool;
use uuid::Uuid;

use crate::domain::repo::{UserRecord, UsersRepository};

/// Idempotent schema setup. Portable DDL: the same statements run on both
/// supported backends.
pub async fn ensure_schema(pool: &AnyPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            username      TEXT UNIQUE,
            display_name  TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL,
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// sqlx-backed repository; one implementation for both engines.
pub struct SqlUsersRepository {
    pool: AnyPool,
}

impl SqlUsersRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for SqlUsersRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>> {
        let row = entity::find_by_id(&self.pool, id).await?;
        row.map(mapper::row_to_record).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let row = entity::find_by_email(&self.pool, email).await?;
        row.map(mapper::row_to_record).transpose()
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> anyhow::Result<bool> {
        entity::email_exists(&self.pool, email, exclude).await
    }

    async fn username_exists(
        &self,
        username: &str,
        exclude: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        entity::username_exists(&self.pool, username, exclude).await
    }

    async fn insert(&self, record: UserRecord) -> anyhow::Result<()> {
        entity::insert(&self.pool, mapper::record_to_row(&record)).await
    }

    async fn update(&self, record: UserRecord) -> anyhow::Result<()> {
        entity::update(&self.pool, mapper::record_to_row(&record)).await
    }

    async fn list(&self) -> anyhow::Result<Vec<UserRecord>> {
        let rows = entity::list(&self.pool).await?;
        rows.into_iter().map(mapper::row_to_record).collect()
    }

    async fn count_active_admins(&self) -> anyhow::Result<i64> {
        entity::count_active_admins(&self.pool).await
    }
}
