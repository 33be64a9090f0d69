use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use restkit::problem::{from_parts, ProblemResponse};

use crate::contract::Claims;
use crate::infra::token::TokenSigner;

/// Extractor requiring a valid bearer token. The verifier is injected into
/// request extensions when the router is assembled.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn verifier(parts: &Parts) -> Result<Arc<TokenSigner>, ProblemResponse> {
    parts
        .extensions
        .get::<Arc<TokenSigner>>()
        .cloned()
        .ok_or_else(|| {
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_WIRING",
                "Internal error",
                "Token verifier is not configured",
                parts.uri.path(),
            )
        })
}

impl<S: Send + Sync> FromRequestParts<S> for AuthClaims {
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let signer = verifier(parts)?;
        let token = bearer_token(parts).ok_or_else(|| {
            from_parts(
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING_TOKEN",
                "Unauthorized",
                "Missing bearer token",
                parts.uri.path(),
            )
        })?;
        let claims = signer.verify(token).map_err(|_| {
            from_parts(
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Unauthorized",
                "Session token is invalid or expired",
                parts.uri.path(),
            )
        })?;
        Ok(AuthClaims(claims))
    }
}
