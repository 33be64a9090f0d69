use axum::http::StatusCode;
use restkit::problem::{from_parts, ProblemResponse};

use crate::domain::error::PropertiesError;

/// Map a properties domain error to an RFC 9457 problem response.
pub fn map_properties_error(e: &PropertiesError, instance: &str) -> ProblemResponse {
    match e {
        PropertiesError::NotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "PROPERTIES_NOT_FOUND",
            "Property not found",
            format!("Property with id {id} was not found"),
            instance,
        ),
        PropertiesError::Forbidden { required } => from_parts(
            StatusCode::FORBIDDEN,
            "AUTH_FORBIDDEN",
            "Forbidden",
            format!("This operation requires the {} role", required.as_str()),
            instance,
        ),
        PropertiesError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "PROPERTIES_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        PropertiesError::Database { .. } => {
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
