use std::sync::Arc;

use axum::extract::Path;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use restkit::Json;
use uuid::Uuid;

use crate::api::rest::dto::{CreateUserReq, LoginReq, LoginResp, UpdateUserReq, UserDto};
use crate::api::rest::error::map_accounts_error;
use crate::api::rest::extract::AuthClaims;
use crate::contract::Role;
use crate::domain::service::Service;

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, body = LoginResp),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "accounts"
)]
pub async fn login(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    Json(req): Json<LoginReq>,
) -> Response {
    match service.login(&req.email, &req.credential).await {
        Ok((token, user)) => Json(LoginResp {
            token,
            user: user.into(),
        })
        .into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, body = UserDto),
        (status = 401, description = "Missing or invalid token"),
    ),
    tag = "accounts"
)]
pub async fn me(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
) -> Response {
    match service.me(&claims).await {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, body = [UserDto])),
    tag = "accounts"
)]
pub async fn list_users(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
) -> Response {
    if let Err(e) = Service::require_role(&claims, Role::Admin) {
        return map_accounts_error(&e, uri.path()).into_response();
    }
    match service.list_users().await {
        Ok(users) => Json(users.into_iter().map(UserDto::from).collect::<Vec<_>>()).into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, body = UserDto), (status = 404, description = "Not found")),
    tag = "accounts"
)]
pub async fn get_user(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(e) = Service::require_role(&claims, Role::Admin) {
        return map_accounts_error(&e, uri.path()).into_response();
    }
    match service.get_user(id).await {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserReq,
    responses(
        (status = 201, body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or username already exists"),
    ),
    tag = "accounts"
)]
pub async fn create_user(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<CreateUserReq>,
) -> Response {
    if let Err(e) = Service::require_role(&claims, Role::Admin) {
        return map_accounts_error(&e, uri.path()).into_response();
    }
    match service.create_user(req.into()).await {
        Ok(user) => (StatusCode::CREATED, Json(UserDto::from(user))).into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, body = UserDto),
        (status = 403, description = "Self role/active change"),
        (status = 409, description = "Conflict"),
    ),
    tag = "accounts"
)]
pub async fn update_user(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserReq>,
) -> Response {
    if let Err(e) = Service::require_role(&claims, Role::Admin) {
        return map_accounts_error(&e, uri.path()).into_response();
    }
    match service.update_user(id, req.into(), &claims).await {
        Ok(user) => Json(UserDto::from(user)).into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Deactivated"),
        (status = 409, description = "Last active admin"),
    ),
    tag = "accounts"
)]
pub async fn deactivate_user(
    Extension(service): Extension<Arc<Service>>,
    uri: Uri,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(e) = Service::require_role(&claims, Role::Admin) {
        return map_accounts_error(&e, uri.path()).into_response();
    }
    match service.deactivate_user(id, &claims).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_accounts_error(&e, uri.path()).into_response(),
    }
}
