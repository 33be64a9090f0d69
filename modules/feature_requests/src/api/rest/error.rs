use axum::http::StatusCode;
use restkit::problem::{from_parts, ProblemResponse};

use crate::domain::error::FeatureRequestsError;

/// Map a feature-requests domain error to an RFC 9457 problem response.
pub fn map_feature_requests_error(e: &FeatureRequestsError, instance: &str) -> ProblemResponse {
    match e {
        FeatureRequestsError::NotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "FEATURE_REQUESTS_NOT_FOUND",
            "Feature request not found",
            format!("Feature request with id {id} was not found"),
            instance,
        ),
        FeatureRequestsError::Forbidden { required } => from_parts(
            StatusCode::FORBIDDEN,
            "AUTH_FORBIDDEN",
            "Forbidden",
            format!("This operation requires the {} role", required.as_str()),
            instance,
        ),
        FeatureRequestsError::Validation { .. } => from_parts(
            StatusCode::BAD_REQUEST,
            "FEATURE_REQUESTS_VALIDATION",
            "Validation error",
            e.to_string(),
            instance,
        ),
        FeatureRequestsError::Database { .. } => {
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
