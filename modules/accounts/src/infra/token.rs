use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::contract::{Claims, User};
use crate::domain::error::AccountsError;

/// Issues and verifies signed, time-limited session tokens (HS256).
/// Verification is stateless: there is no server-side session table.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token embedding the user's id, email, display name and role.
    pub fn issue(&self, user: &User) -> Result<String, AccountsError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.display_name.clone(),
            role: user.role,
            iat,
            exp: iat + self.ttl.as_secs() as i64,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AccountsError::database(format!("token encoding failed: {e}")))
    }

    /// Verify signature and expiry; any failure collapses to `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AccountsError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AccountsError::InvalidToken)
    }
}
