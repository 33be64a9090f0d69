use anyhow::Context;
use uuid::Uuid;

use crate::contract::Role;
use crate::domain::repo::UserRecord;
use crate::infra::storage::entity::UserRow;

/// Convert a database row into the domain record.
pub fn row_to_record(row: UserRow) -> anyhow::Result<UserRecord> {
    Ok(UserRecord {
        id: Uuid::parse_str(&row.id).context("malformed user id")?,
        role: Role::parse(&row.role)
            .with_context(|| format!("unknown role '{}'", row.role))?,
        active: row.active != 0,
        created_at: db::time::decode_ts(&row.created_at).context("malformed created_at")?,
        updated_at: db::time::decode_ts(&row.updated_at).context("malformed updated_at")?,
        email: row.email,
        username: row.username,
        display_name: row.display_name,
        password_hash: row.password_hash,
    })
}

/// Convert a domain record into its storage row.
pub fn record_to_row(record: &UserRecord) -> UserRow {
    UserRow {
        id: record.id.to_string(),
        email: record.email.clone(),
        username: record.username.clone(),
        display_name: record.display_name.clone(),
        password_hash: record.password_hash.clone(),
        role: record.role.as_str().to_string(),
        active: i64::from(record.active),
        created_at: db::time::encode_ts(record.created_at),
        updated_at: db::time::encode_ts(record.updated_at),
    }
}
