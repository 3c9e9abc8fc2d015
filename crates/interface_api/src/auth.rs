//! Authentication
//!
//! Bearer tokens carry the caller's id, name and role, so the auth
//! middleware can rebuild an [`Actor`] without a directory lookup.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use core_kernel::UserId;
use domain_identity::{Actor, Role, User};

/// Longest token lifetime issued, whatever the configuration says
pub const MAX_EXPIRATION_SECS: u64 = 365 * 24 * 60 * 60;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name, recorded on decisions and payments
    pub name: String,
    /// User's role
    pub role: Role,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

impl Claims {
    /// The caller identity carried by the token
    pub fn actor(&self) -> Result<Actor, AuthError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(Actor::new(UserId::from_uuid(id), self.name.clone(), self.role))
    }
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token could not be signed")]
    Signing,
}

/// Creates a signed token for `user`
pub fn create_token(user: &User, secret: &str, expiration_secs: u64) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs.min(MAX_EXPIRATION_SECS) as i64);

    let claims = Claims {
        sub: user.id.as_uuid().to_string(),
        name: user.name.clone(),
        role: user.role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::Signing)
}

/// Validates a token and returns its claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(),
            name: "Thandi HR".to_string(),
            email: "hr@cmcs.com".to_string(),
            password_hash: String::new(),
            role: Role::Hr,
            phone_number: None,
            registered_at: Utc::now(),
            is_active: true,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = user();
        let token = create_token(&user, "secret", 60).unwrap();
        let actor = validate_token(&token, "secret").unwrap().actor().unwrap();
        assert_eq!(actor.user_id, user.id);
        assert_eq!(actor.name, "Thandi HR");
        assert_eq!(actor.role, Role::Hr);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(&user(), "secret", 60).unwrap();
        assert!(matches!(
            validate_token(&token, "other"),
            Err(AuthError::InvalidToken)
        ));
    }
}
