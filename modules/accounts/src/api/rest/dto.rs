use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::{NewUser, Role, User, UserPatch};

/// REST DTO for an account. The credential hash never leaves the domain.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
    pub display_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    pub email: String,
    pub credential: String,
}

/// Login response: signed session token plus the account summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResp {
    pub token: String,
    pub user: UserDto,
}

/// REST DTO for creating an account (admin action).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub display_name: String,
    pub password: String,
    pub role: Role,
}

/// Typed partial update. Unknown fields are rejected rather than merged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserReq {
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            email: req.email,
            username: req.username,
            display_name: req.display_name,
            password: req.password,
            role: req.role,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            email: req.email,
            username: req.username,
            display_name: req.display_name,
            password: req.password,
            role: req.role,
            active: req.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_req_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateUserReq>(r#"{"display_name":"x","is_admin":true}"#);
        assert!(err.is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""viewer""#).unwrap(),
            Role::Viewer
        );
    }
}
