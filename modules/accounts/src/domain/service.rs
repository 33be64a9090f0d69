use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::{Claims, NewUser, Role, User, UserPatch};
use crate::domain::error::AccountsError;
use crate::domain::repo::{UserRecord, UsersRepository};
use crate::infra::password::{hash_password, verify_password};
use crate::infra::token::TokenSigner;

const MIN_PASSWORD_LEN: usize = 8;

/// Domain service for authentication and user management.
/// Holds no state of its own beyond its ports; storage owns all durable state.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    tokens: Arc<TokenSigner>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, tokens: Arc<TokenSigner>) -> Self {
        Self { repo, tokens }
    }

    // --- authentication ---

    /// Verify credentials and issue a session token. Unknown, inactive and
    /// mismatched accounts are indistinguishable to the caller.
    #[instrument(name = "accounts.service.login", skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AccountsError> {
        let record = self
            .repo
            .find_by_email(email)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?
            .ok_or(AccountsError::InvalidCredentials)?;

        if !record.active || !verify_password(password, &record.password_hash) {
            return Err(AccountsError::InvalidCredentials);
        }

        let user = record.to_user();
        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "login succeeded");
        Ok((token, user))
    }

    /// Stateless token verification.
    pub fn verify(&self, token: &str) -> Result<Claims, AccountsError> {
        self.tokens.verify(token)
    }

    /// Role gate. Admin satisfies every requirement.
    pub fn require_role(claims: &Claims, required: Role) -> Result<(), AccountsError> {
        if claims.role.satisfies(required) {
            Ok(())
        } else {
            Err(AccountsError::Forbidden { required })
        }
    }

    /// Resolve the account behind a set of claims from storage, so that a
    /// deactivated user stops resolving even while their token is unexpired.
    #[instrument(name = "accounts.service.me", skip(self, claims), fields(user_id = %claims.sub))]
    pub async fn me(&self, claims: &Claims) -> Result<User, AccountsError> {
        let record = self
            .repo
            .find_by_id(claims.sub)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?
            .filter(|r| r.active)
            .ok_or(AccountsError::InvalidToken)?;
        Ok(record.to_user())
    }

    // --- user management (admin surface) ---

    #[instrument(name = "accounts.service.create_user", skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, AccountsError> {
        validate_email(&new_user.email)?;
        validate_display_name(&new_user.display_name)?;
        validate_password(&new_user.password)?;

        if self
            .repo
            .email_exists(&new_user.email, None)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?
        {
            return Err(AccountsError::EmailTaken {
                email: new_user.email,
            });
        }
        if let Some(ref username) = new_user.username {
            validate_username(username)?;
            if self
                .repo
                .username_exists(username, None)
                .await
                .map_err(|e| AccountsError::database(e.to_string()))?
            {
                return Err(AccountsError::UsernameTaken {
                    username: username.clone(),
                });
            }
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: new_user.email,
            username: new_user.username,
            display_name: new_user.display_name,
            password_hash: hash_password(&new_user.password)?,
            role: new_user.role,
            active: true,
            created_at: now,
            updated_at: now,
        };

        self.repo
            .insert(record.clone())
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?;

        info!(user_id = %record.id, "created user");
        Ok(record.to_user())
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AccountsError> {
        let record = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?
            .ok_or(AccountsError::UserNotFound { id })?;
        Ok(record.to_user())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AccountsError> {
        let records = self
            .repo
            .list()
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?;
        Ok(records.iter().map(UserRecord::to_user).collect())
    }

    /// Partial update. Rejects self role/active changes and anything that
    /// would leave the system without an active admin.
    #[instrument(name = "accounts.service.update_user", skip(self, patch, actor), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: Uuid,
        patch: UserPatch,
        actor: &Claims,
    ) -> Result<User, AccountsError> {
        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?
            .ok_or(AccountsError::UserNotFound { id })?;

        let changes_role = patch.role.is_some_and(|r| r != current.role);
        let deactivates = patch.active == Some(false) && current.active;

        if actor.sub == id && (changes_role || patch.active.is_some()) {
            return Err(AccountsError::SelfChange);
        }

        // Demoting or deactivating the last active admin would lock everyone out.
        let loses_admin = current.active
            && current.role == Role::Admin
            && (deactivates || patch.role.is_some_and(|r| r != Role::Admin));
        if loses_admin && self.active_admin_count().await? <= 1 {
            return Err(AccountsError::LastAdmin);
        }

        if let Some(ref email) = patch.email {
            validate_email(email)?;
            if email != &current.email
                && self
                    .repo
                    .email_exists(email, Some(id))
                    .await
                    .map_err(|e| AccountsError::database(e.to_string()))?
            {
                return Err(AccountsError::EmailTaken {
                    email: email.clone(),
                });
            }
            current.email = email.clone();
        }
        if let Some(ref username) = patch.username {
            validate_username(username)?;
            if current.username.as_deref() != Some(username)
                && self
                    .repo
                    .username_exists(username, Some(id))
                    .await
                    .map_err(|e| AccountsError::database(e.to_string()))?
            {
                return Err(AccountsError::UsernameTaken {
                    username: username.clone(),
                });
            }
            current.username = Some(username.clone());
        }
        if let Some(ref display_name) = patch.display_name {
            validate_display_name(display_name)?;
            current.display_name = display_name.clone();
        }
        if let Some(ref password) = patch.password {
            validate_password(password)?;
            current.password_hash = hash_password(password)?;
        }
        if let Some(role) = patch.role {
            current.role = role;
        }
        if let Some(active) = patch.active {
            current.active = active;
        }
        current.updated_at = Utc::now();

        self.repo
            .update(current.clone())
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?;

        info!("updated user");
        Ok(current.to_user())
    }

    /// Soft delete: accounts are deactivated, never removed.
    #[instrument(name = "accounts.service.deactivate_user", skip(self, actor), fields(user_id = %id))]
    pub async fn deactivate_user(&self, id: Uuid, actor: &Claims) -> Result<(), AccountsError> {
        if actor.sub == id {
            return Err(AccountsError::SelfChange);
        }

        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?
            .ok_or(AccountsError::UserNotFound { id })?;

        if !current.active {
            debug!("user already inactive");
            return Ok(());
        }

        if current.role == Role::Admin && self.active_admin_count().await? <= 1 {
            return Err(AccountsError::LastAdmin);
        }

        current.active = false;
        current.updated_at = Utc::now();
        self.repo
            .update(current)
            .await
            .map_err(|e| AccountsError::database(e.to_string()))?;

        info!("deactivated user");
        Ok(())
    }

    /// Seed the configured admin when no active admin exists. Keeps the
    /// "at least one active admin" invariant true from the first boot.
    #[instrument(name = "accounts.service.ensure_bootstrap_admin", skip_all)]
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<User>, AccountsError> {
        if self.active_admin_count().await? > 0 {
            debug!("active admin present, skipping bootstrap");
            return Ok(None);
        }

        warn!(email, "no active admin found, seeding bootstrap admin");
        let user = self
            .create_user(NewUser {
                email: email.to_string(),
                username: None,
                display_name: display_name.to_string(),
                password: password.to_string(),
                role: Role::Admin,
            })
            .await?;
        Ok(Some(user))
    }

    async fn active_admin_count(&self) -> Result<i64, AccountsError> {
        self.repo
            .count_active_admins()
            .await
            .map_err(|e| AccountsError::database(e.to_string()))
    }
}

// --- validation helpers ---

fn validate_email(email: &str) -> Result<(), AccountsError> {
    if email.is_empty() || !email.contains('@') || !email.contains('.') {
        return Err(AccountsError::validation("email", "invalid email format"));
    }
    Ok(())
}

fn validate_display_name(display_name: &str) -> Result<(), AccountsError> {
    if display_name.trim().is_empty() {
        return Err(AccountsError::validation(
            "display_name",
            "display name cannot be empty",
        ));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), AccountsError> {
    if username.trim().is_empty() {
        return Err(AccountsError::validation(
            "username",
            "username cannot be empty",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AccountsError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AccountsError::validation(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}
