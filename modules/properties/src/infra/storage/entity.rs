//! Raw row shapes and SQL. Everything here sticks to `$n` placeholders and
//! Any-compatible column types so the same statements run on both backends.

use sqlx::AnyPool;

/// Row as stored: uuids and timestamps as TEXT, coordinates as a JSON array
/// in a TEXT column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PropertyRow {
    pub id: String,
    pub address: String,
    pub zoning: String,
    pub value: f64,
    pub notes: String,
    pub tax_value: Option<f64>,
    pub cap_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    pub coordinates: Option<String>,
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub creator_id: Option<String>,
    pub creator_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str = "id, address, zoning, value, notes, tax_value, cap_rate, \
     monthly_payment, coordinates, thumbs_up, thumbs_down, creator_id, \
     creator_name, created_at, updated_at";

pub async fn list(pool: &AnyPool) -> anyhow::Result<Vec<PropertyRow>> {
    let sql = format!("SELECT {COLUMNS} FROM properties ORDER BY created_at DESC, id");
    Ok(sqlx::query_as::<_, PropertyRow>(&sql).fetch_all(pool).await?)
}

pub async fn find_by_id(pool: &AnyPool, id: &str) -> anyhow::Result<Option<PropertyRow>> {
    let sql = format!("SELECT {COLUMNS} FROM properties WHERE id = $1");
    Ok(sqlx::query_as::<_, PropertyRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn insert(pool: &AnyPool, row: PropertyRow) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO properties (id, address, zoning, value, notes, tax_value,
            cap_rate, monthly_payment, coordinates, thumbs_up, thumbs_down,
            creator_id, creator_name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(row.id)
    .bind(row.address)
    .bind(row.zoning)
    .bind(row.value)
    .bind(row.notes)
    .bind(row.tax_value)
    .bind(row.cap_rate)
    .bind(row.monthly_payment)
    .bind(row.coordinates)
    .bind(row.thumbs_up)
    .bind(row.thumbs_down)
    .bind(row.creator_id)
    .bind(row.creator_name)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Full-row overwrite; counters and creator columns are not touched here.
/// Counters move only through `vote`, the creator snapshot never moves.
/// Returns whether the row still existed.
pub async fn update(pool: &AnyPool, row: PropertyRow) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE properties
        SET address = $1, zoning = $2, value = $3, notes = $4, tax_value = $5,
            cap_rate = $6, monthly_payment = $7, coordinates = $8,
            updated_at = $9
        WHERE id = $10
        "#,
    )
    .bind(row.address)
    .bind(row.zoning)
    .bind(row.value)
    .bind(row.notes)
    .bind(row.tax_value)
    .bind(row.cap_rate)
    .bind(row.monthly_payment)
    .bind(row.coordinates)
    .bind(row.updated_at)
    .bind(row.id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected() > 0)
}

/// Single-statement increment with RETURNING. Concurrent callers each land
/// their own `+ 1`; there is no read-then-write window to lose.
pub async fn bump_counter(
    pool: &AnyPool,
    id: &str,
    column: &str,
    updated_at: &str,
) -> anyhow::Result<Option<PropertyRow>> {
    debug_assert!(column == "thumbs_up" || column == "thumbs_down");
    let sql = format!(
        "UPDATE properties SET {column} = {column} + 1, updated_at = $1 \
         WHERE id = $2 RETURNING {COLUMNS}"
    );
    Ok(sqlx::query_as::<_, PropertyRow>(&sql)
        .bind(updated_at)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn delete(pool: &AnyPool, id: &str) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all(pool: &AnyPool) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM properties").execute(pool).await?;
    Ok(res.rows_affected())
}
