use std::sync::Arc;

use axum::extract::Path;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use restkit::Json;
use uuid::Uuid;

use accounts::api::rest::AuthClaims;

use crate::api::rest::dto::{CreateFeatureRequestReq, UpdateFeatureRequestReq};
use crate::api::rest::error::map_feature_requests_error;
use crate::contract::FeatureRequest;
use crate::domain::service::Service;

#[utoipa::path(
    post,
    path = "/feature-request",
    request_body = CreateFeatureRequestReq,
    responses(
        (status = 201, body = FeatureRequest),
        (status = 400, description = "Missing description"),
    ),
    tag = "feature_requests"
)]
pub async fn create(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<CreateFeatureRequestReq>,
) -> Response {
    match service.create(req.into()).await {
        Ok(request) => (StatusCode::CREATED, Json(request)).into_response(),
        Err(e) => map_feature_requests_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/feature-requests",
    responses((status = 200, body = [FeatureRequest])),
    tag = "feature_requests"
)]
pub async fn list(Extension(service): Extension<Arc<Service>>, uri: Uri) -> Response {
    match service.list().await {
        Ok(requests) => Json(requests).into_response(),
        Err(e) => map_feature_requests_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/feature-requests/{id}",
    params(("id" = Uuid, Path, description = "Feature request id")),
    responses((status = 200, body = FeatureRequest), (status = 404, description = "Not found")),
    tag = "feature_requests"
)]
pub async fn get(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    Path(id): Path<Uuid>,
) -> Response {
    match service.get(id).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => map_feature_requests_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/feature-requests/{id}",
    params(("id" = Uuid, Path, description = "Feature request id")),
    request_body = UpdateFeatureRequestReq,
    responses(
        (status = 200, body = FeatureRequest),
        (status = 403, description = "Requires admin"),
        (status = 404, description = "Not found"),
    ),
    tag = "feature_requests"
)]
pub async fn set_status(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFeatureRequestReq>,
) -> Response {
    match service.set_status(id, req.status, &claims).await {
        Ok(request) => Json(request).into_response(),
        Err(e) => map_feature_requests_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/feature-requests/{id}",
    params(("id" = Uuid, Path, description = "Feature request id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Requires admin"),
        (status = 404, description = "Not found"),
    ),
    tag = "feature_requests"
)]
pub async fn delete(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> Response {
    match service.delete(id, &claims).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_feature_requests_error(&e, uri.path()).into_response(),
    }
}
