use accounts::Role;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("property not found: {id}")]
    NotFound { id: Uuid },

    #[error("forbidden: requires {required:?} role")]
    Forbidden { required: Role },

    #[error("validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("database error: {message}")]
    Database { message: String },
}

impl PropertiesError {
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
