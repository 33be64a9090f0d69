//! JSON body extractor whose rejection is a problem+json response.
//!
//! axum's `Json` rejects malformed bodies with plain-text serde errors;
//! routing those through `Problem` keeps every error on the wire in the
//! same machine-readable shape, with deserialization failures reported
//! as 400 under a stable code.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::problem::{from_parts, ProblemResponse};

/// Machine-readable code carried by body-rejection problems.
pub const REQUEST_VALIDATION: &str = "REQUEST_VALIDATION";

/// Drop-in replacement for `axum::Json`: same response behavior, but
/// extraction failures render as RFC 9457 problems instead of plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ProblemResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => {
                // Unparseable or schema-violating bodies are the caller's
                // validation failure; transport-level rejections (missing
                // content type, oversized body) keep their own status.
                let status = match &rejection {
                    JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    other => other.status(),
                };
                Err(from_parts(
                    status,
                    REQUEST_VALIDATION,
                    "Invalid request body",
                    rejection.body_text(),
                    &instance,
                ))
            }
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
