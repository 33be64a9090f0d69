use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::{Role, User};

/// Internal persistence shape of an account. Unlike the contract `User`,
/// this carries the hashed credential; it never crosses the contract
/// boundary.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Port for the domain layer: persistence operations the accounts service needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRecord>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
    /// Uniqueness check, optionally ignoring one account (for updates).
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> anyhow::Result<bool>;
    async fn username_exists(&self, username: &str, exclude: Option<Uuid>)
        -> anyhow::Result<bool>;
    /// Insert a fully-formed record. Service computes id/hash/timestamps.
    async fn insert(&self, record: UserRecord) -> anyhow::Result<()>;
    /// Update an existing record by primary key.
    async fn update(&self, record: UserRecord) -> anyhow::Result<()>;
    /// All accounts, newest first.
    async fn list(&self) -> anyhow::Result<Vec<UserRecord>>;
    /// Number of accounts that are active admins.
    async fn count_active_admins(&self) -> anyhow::Result<i64>;
}
