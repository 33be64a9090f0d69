use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use accounts::infra::token::TokenSigner;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Assemble the feature-requests router. Submission keeps its historical
/// singular path; reads are open, lifecycle changes and deletion are admin.
pub fn router(service: Arc<Service>, signer: Arc<TokenSigner>) -> Router {
    Router::new()
        .route("/feature-request", post(handlers::create))
        .route("/feature-requests", get(handlers::list))
        .route(
            "/feature-requests/{id}",
            get(handlers::get)
                .put(handlers::set_status)
                .delete(handlers::delete),
        )
        .layer(Extension(service))
        .layer(Extension(signer))
}
