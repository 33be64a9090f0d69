use thiserror::Error;
use uuid::Uuid;

use crate::contract::Role;

/// Domain-specific errors for the accounts module.
#[derive(Error, Debug)]
pub enum AccountsError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Requires {required:?} role")]
    Forbidden { required: Role },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("User with email '{email}' already exists")]
    EmailTaken { email: String },

    #[error("Username '{username}' already exists")]
    UsernameTaken { username: String },

    #[error("Cannot change the role or active flag of your own account")]
    SelfChange,

    #[error("At least one active admin account must remain")]
    LastAdmin,

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl AccountsError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
