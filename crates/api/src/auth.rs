use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.jwt_secret.as_bytes())
    }
}

/// Bearer-token claims: the user's identity plus the role name, so
/// downstream authorization never needs a database round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::User => "User",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(UserRole::Admin),
            "User" => Some(UserRole::User),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            UserRole::Admin => entity::role::ADMIN_ROLE_ID,
            UserRole::User => entity::role::USER_ROLE_ID,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            entity::role::ADMIN_ROLE_ID => Some(UserRole::Admin),
            entity::role::USER_ROLE_ID => Some(UserRole::User),
            _ => None,
        }
    }
}

/// The authenticated caller, passed explicitly into service calls that
/// need it. There is no ambient request state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        self.require_role(UserRole::Admin)
    }

    pub fn require_role(&self, role: UserRole) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::unauthorized(format!(
                "this operation requires the {} role",
                role.as_str()
            )))
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
        let claims = decode_token(&token, &config)
            .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;
        let role = UserRole::from_str(&claims.role)
            .ok_or_else(|| ApiError::unauthorized("unrecognized role in token"))?;
        Ok(CurrentUser {
            user_id: claims.sub,
            role,
        })
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?;
    let text = value.to_str().ok()?;
    text.strip_prefix("Bearer ")
        .map(|rest| rest.trim().to_string())
}

pub fn issue_token(
    user_id: Uuid,
    role: &str,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::minutes(config.session_ttl_minutes))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = SessionClaims {
        sub: user_id,
        role: role.to_string(),
        exp,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
}

pub fn decode_token(
    token: &str,
    config: &AuthConfig,
) -> jsonwebtoken::errors::Result<SessionClaims> {
    jsonwebtoken::decode::<SessionClaims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}

/// Salted one-way hash; the plaintext is never stored.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::internal(format!("failed to hash password: {err}")))
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            session_ttl_minutes: 15,
        }
    }

    #[test]
    fn token_round_trip_preserves_identity_and_role() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, "Admin", &config()).unwrap();
        let claims = decode_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "Admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = AuthConfig {
            jwt_secret: "other-secret".into(),
            session_ttl_minutes: 15,
        };
        let token = issue_token(Uuid::new_v4(), "User", &other).unwrap();
        assert!(decode_token(&token, &config()).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }
}
