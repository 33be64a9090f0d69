use sqlx::AnyPool;
use uuid::Uuid;

/// Raw persistence row. Column types are restricted to what the Any driver
/// supports on both engines; uuids/roles/timestamps stay TEXT here and are
/// converted in the mapper.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub active: i64,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str =
    "id, email, username, display_name, password_hash, role, active, created_at, updated_at";

pub async fn find_by_id(pool: &AnyPool, id: Uuid) -> anyhow::Result<Option<UserRow>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &AnyPool, email: &str) -> anyhow::Result<Option<UserRow>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn email_exists(
    pool: &AnyPool,
    email: &str,
    exclude: Option<Uuid>,
) -> anyhow::Result<bool> {
    let count: i64 = match exclude {
        Some(id) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2")
                .bind(email)
                .bind(id.to_string())
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count > 0)
}

pub async fn username_exists(
    pool: &AnyPool,
    username: &str,
    exclude: Option<Uuid>,
) -> anyhow::Result<bool> {
    let count: i64 = match exclude {
        Some(id) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1 AND id <> $2")
                .bind(username)
                .bind(id.to_string())
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count > 0)
}

pub async fn insert(pool: &AnyPool, row: UserRow) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, username, display_name, password_hash,
                           role, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(row.id)
    .bind(row.email)
    .bind(row.username)
    .bind(row.display_name)
    .bind(row.password_hash)
    .bind(row.role)
    .bind(row.active)
    .bind(row.created_at)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update(pool: &AnyPool, row: UserRow) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET email = $2, username = $3, display_name = $4, password_hash = $5,
            role = $6, active = $7, updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(row.id)
    .bind(row.email)
    .bind(row.username)
    .bind(row.display_name)
    .bind(row.password_hash)
    .bind(row.role)
    .bind(row.active)
    .bind(row.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &AnyPool) -> anyhow::Result<Vec<UserRow>> {
    let sql = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id");
    let rows = sqlx::query_as::<_, UserRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn count_active_admins(pool: &AnyPool) -> anyhow::Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin' AND active = 1")
            .fetch_one(pool)
            .await?;
    Ok(count)
}
