use anyhow::Context;
use async_trait::async_trait;
use sqlx::AnyPool;
use uuid::Uuid;

use crate::contract::{FeatureRequest, FeatureStatus};
use crate::domain::repo::FeatureRequestsRepository;

/// Idempotent schema setup with portable DDL.
pub async fn ensure_schema(pool: &AnyPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS feature_requests (
            id              TEXT PRIMARY KEY,
            description     TEXT NOT NULL,
            submitter_email TEXT,
            status          TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct FeatureRequestRow {
    id: String,
    description: String,
    submitter_email: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

fn row_to_request(row: FeatureRequestRow) -> anyhow::Result<FeatureRequest> {
    Ok(FeatureRequest {
        id: Uuid::parse_str(&row.id).context("bad feature request id")?,
        description: row.description,
        submitter_email: row.submitter_email,
        status: FeatureStatus::parse(&row.status)
            .with_context(|| format!("unknown feature request status '{}'", row.status))?,
        created_at: db::time::decode_ts(&row.created_at)?,
        updated_at: db::time::decode_ts(&row.updated_at)?,
    })
}

const COLUMNS: &str = "id, description, submitter_email, status, created_at, updated_at";

/// sqlx-backed repository; one implementation for both engines.
pub struct SqlFeatureRequestsRepository {
    pool: AnyPool,
}

impl SqlFeatureRequestsRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeatureRequestsRepository for SqlFeatureRequestsRepository {
    async fn list(&self) -> anyhow::Result<Vec<FeatureRequest>> {
        let sql = format!("SELECT {COLUMNS} FROM feature_requests ORDER BY created_at DESC, id");
        let rows = sqlx::query_as::<_, FeatureRequestRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(row_to_request).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FeatureRequest>> {
        let sql = format!("SELECT {COLUMNS} FROM feature_requests WHERE id = $1");
        let row = sqlx::query_as::<_, FeatureRequestRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(row_to_request).transpose()
    }

    async fn insert(&self, request: FeatureRequest) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO feature_requests (id, description, submitter_email,
                status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(request.id.to_string())
        .bind(request.description)
        .bind(request.submitter_email)
        .bind(request.status.as_str())
        .bind(db::time::encode_ts(request.created_at))
        .bind(db::time::encode_ts(request.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, request: FeatureRequest) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE feature_requests
            SET description = $1, submitter_email = $2, status = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(request.description)
        .bind(request.submitter_email)
        .bind(request.status.as_str())
        .bind(db::time::encode_ts(request.updated_at))
        .bind(request.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM feature_requests WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
