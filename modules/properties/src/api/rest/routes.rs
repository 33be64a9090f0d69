use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use restkit::SseBroadcaster;

use accounts::infra::token::TokenSigner;

use crate::api::rest::handlers;
use crate::domain::events::PropertyEvent;
use crate::domain::service::Service;

/// Assemble the properties router. Reads are public; create and the two
/// delete shapes require a token (admin for deletion, checked in the
/// service). The event stream is public like the reads it complements.
pub fn router(
    service: Arc<Service>,
    signer: Arc<TokenSigner>,
    broadcaster: SseBroadcaster<PropertyEvent>,
) -> Router {
    Router::new()
        .route(
            "/properties",
            get(handlers::list)
                .post(handlers::create)
                .delete(handlers::delete_all),
        )
        .route("/properties/events", get(handlers::events))
        .route(
            "/properties/{id}",
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .route("/properties/{id}/vote", post(handlers::vote))
        .layer(Extension(service))
        .layer(Extension(signer))
        .layer(Extension(broadcaster))
}
