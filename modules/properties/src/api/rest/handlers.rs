use std::sync::Arc;

use axum::extract::Path;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use restkit::{Json, SseBroadcaster};
use uuid::Uuid;

use accounts::api::rest::AuthClaims;

use crate::api::rest::dto::{CreatePropertyReq, DeleteAllResp, UpdatePropertyReq, VoteReq};
use crate::api::rest::error::map_properties_error;
use crate::contract::Property;
use crate::domain::events::PropertyEvent;
use crate::domain::service::Service;

#[utoipa::path(
    get,
    path = "/properties",
    responses((status = 200, body = [Property])),
    tag = "properties"
)]
pub async fn list(Extension(service): Extension<Arc<Service>>, uri: Uri) -> Response {
    match service.list().await {
        Ok(properties) => Json(properties).into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/properties/{id}",
    params(("id" = Uuid, Path, description = "Property id")),
    responses((status = 200, body = Property), (status = 404, description = "Not found")),
    tag = "properties"
)]
pub async fn get(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    Path(id): Path<Uuid>,
) -> Response {
    match service.get(id).await {
        Ok(property) => Json(property).into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/properties",
    request_body = CreatePropertyReq,
    responses(
        (status = 201, body = Property),
        (status = 400, description = "Missing address"),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "properties"
)]
pub async fn create(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<CreatePropertyReq>,
) -> Response {
    match service.create(req.into(), &claims).await {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/properties/{id}",
    params(("id" = Uuid, Path, description = "Property id")),
    request_body = UpdatePropertyReq,
    responses((status = 200, body = Property), (status = 404, description = "Not found")),
    tag = "properties"
)]
pub async fn update(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePropertyReq>,
) -> Response {
    match service.update(id, req.into()).await {
        Ok(property) => Json(property).into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/properties/{id}/vote",
    params(("id" = Uuid, Path, description = "Property id")),
    request_body = VoteReq,
    responses((status = 200, body = Property), (status = 404, description = "Not found")),
    tag = "properties"
)]
pub async fn vote(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteReq>,
) -> Response {
    match service.vote(id, req.direction).await {
        Ok(property) => Json(property).into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/properties/{id}",
    params(("id" = Uuid, Path, description = "Property id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Requires admin"),
        (status = 404, description = "Not found"),
    ),
    tag = "properties"
)]
pub async fn delete(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> Response {
    match service.delete(id, &claims).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/properties",
    responses(
        (status = 200, body = DeleteAllResp),
        (status = 403, description = "Requires admin"),
    ),
    tag = "properties"
)]
pub async fn delete_all(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
) -> Response {
    match service.delete_all(&claims).await {
        Ok(count) => Json(DeleteAllResp { count }).into_response(),
        Err(e) => map_properties_error(&e, uri.path()).into_response(),
    }
}

/// Live event stream. No replay: subscribers see only mutations committed
/// while they are connected, and re-establish their baseline via `GET
/// /properties` on (re)connect.
#[utoipa::path(
    get,
    path = "/properties/events",
    responses((status = 200, description = "text/event-stream of property events")),
    tag = "properties"
)]
pub async fn events(
    Extension(broadcaster): Extension<SseBroadcaster<PropertyEvent>>,
) -> Response {
    broadcaster.sse_response().into_response()
}
