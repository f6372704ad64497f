use std::sync::Arc;

use chrono::Utc;
use entity::user;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password, AuthConfig, UserRole};
use crate::error::ApiError;
use crate::repo::Repos;
use crate::services::user::UserOut;

#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub token: String,
    pub user: UserOut,
}

#[derive(Clone)]
pub struct AuthService {
    repos: Repos,
    config: Arc<AuthConfig>,
}

impl AuthService {
    pub fn new(repos: Repos, config: Arc<AuthConfig>) -> Self {
        AuthService { repos, config }
    }

    /// Self-registration always lands in the respondent role; there is no
    /// way to mint an administrator through this endpoint.
    pub async fn register(&self, input: RegisterInput) -> Result<UserOut, ApiError> {
        let name = require_field(&input.name, "name")?;
        let email = require_field(&input.email, "email")?;
        if input.password.is_empty() {
            return Err(ApiError::validation("password must not be blank"));
        }
        if self
            .repos
            .roles
            .find(entity::role::USER_ROLE_ID)
            .await?
            .is_none()
        {
            return Err(ApiError::invalid_operation("user role is not seeded"));
        }
        if self.repos.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("a user with this email already exists"));
        }
        let stamp = Utc::now().into();
        let model = self
            .repos
            .users
            .insert(user::Model {
                id: Uuid::new_v4(),
                name,
                email,
                password_hash: hash_password(&input.password)?,
                role_id: entity::role::USER_ROLE_ID,
                address: input.address,
                created_at: stamp,
                updated_at: stamp,
            })
            .await?;
        Ok(model.into())
    }

    /// A missing account and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let invalid = || ApiError::unauthorized("invalid email or password");
        let user = self
            .repos
            .users
            .find_by_email(input.email.trim())
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(&input.password, &user.password_hash) {
            return Err(invalid());
        }
        let role = UserRole::from_id(user.role_id)
            .ok_or_else(|| ApiError::internal("user has an unrecognized role"))?;
        let token = issue_token(user.id, role.as_str(), &self.config)
            .map_err(|err| ApiError::internal(format!("failed to issue token: {err}")))?;
        Ok(LoginOutput {
            token,
            user: user.into(),
        })
    }
}

fn require_field(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}
