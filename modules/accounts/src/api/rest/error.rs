use axum::http::StatusCode;
use restkit::problem::{from_parts, ProblemResponse};

use crate::domain::error::AccountsError;

/// Map an accounts domain error to an RFC 9457 problem response.
pub fn map_accounts_error(e: &AccountsError, instance: &str) -> ProblemResponse {
    match e {
        AccountsError::InvalidCredentials => from_parts(
            StatusCode::UNAUTHORIZED,
            "AUTH_INVALID_CREDENTIALS",
            "Invalid credentials",
            "Email or credential is incorrect",
            instance,
        ),
        AccountsError::InvalidToken => from_parts(
            StatusCode::UNAUTHORIZED,
            "AUTH_INVALID_TOKEN",
            "Invalid token",
            "Session token is missing, invalid or expired",
            instance,
        ),
        AccountsError::Forbidden { required } => from_parts(
            StatusCode::FORBIDDEN,
            "AUTH_FORBIDDEN",
            "Forbidden",
            format!("This operation requires the {} role", required.as_str()),
            instance,
        ),
        AccountsError::UserNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "ACCOUNTS_NOT_FOUND",
            "User not found",
            format!("User with id {id} was not found"),
            instance,
        ),
        AccountsError::EmailTaken { email } => from_parts(
            StatusCode::CONFLICT,
            "ACCOUNTS_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{email}' is already in use"),
            instance,
        ),
        AccountsError::UsernameTaken { username } => from_parts(
            StatusCode::CONFLICT,
            "ACCOUNTS_USERNAME_CONFLICT",
            "Username already exists",
            format!("Username '{username}' is already in use"),
            instance,
        ),
        AccountsError::SelfChange => from_parts(
            StatusCode::FORBIDDEN,
            "ACCOUNTS_SELF_CHANGE",
            "Forbidden",
            "You cannot change the role or active flag of your own account",
            instance,
        ),
        AccountsError::LastAdmin => from_parts(
            StatusCode::CONFLICT,
            "ACCOUNTS_LAST_ADMIN",
            "Last admin",
            "At least one active admin account must remain",
            instance,
        ),
        AccountsError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "ACCOUNTS_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        AccountsError::Database { .. } => {
            // Log the internal error details but don't expose them to the client.
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}
