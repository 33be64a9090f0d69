use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;
use crate::infra::token::TokenSigner;

/// Assemble the accounts router. The signer extension is what the
/// `AuthClaims` extractor reads.
pub fn router(service: Arc<Service>, signer: Arc<TokenSigner>) -> Router {
    Router::new()
        .route("/auth/login", post(handlers::login))
        .route("/auth/me", get(handlers::me))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::deactivate_user),
        )
        .layer(Extension(service))
        .layer(Extension(signer))
}
