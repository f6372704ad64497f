use chrono::Utc;
use entity::user;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::error::ApiError;
use crate::repo::Repos;

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: i32,
    #[serde(default)]
    pub address: Option<String>,
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role_id: Option<i32>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    pub address: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<user::Model> for UserOut {
    fn from(model: user::Model) -> Self {
        UserOut {
            id: model.id,
            name: model.name,
            email: model.email,
            role_id: model.role_id,
            address: model.address,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    repos: Repos,
}

impl UserService {
    pub fn new(repos: Repos) -> Self {
        UserService { repos }
    }

    pub async fn list(&self) -> Result<Vec<UserOut>, ApiError> {
        Ok(self
            .repos
            .users
            .list()
            .await?
            .into_iter()
            .map(UserOut::from)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<UserOut, ApiError> {
        self.repos
            .users
            .find(id)
            .await?
            .map(UserOut::from)
            .ok_or_else(|| ApiError::not_found("user not found"))
    }

    pub async fn create(&self, input: CreateUser) -> Result<UserOut, ApiError> {
        let name = require_field(&input.name, "name")?;
        let email = require_field(&input.email, "email")?;
        if input.password.is_empty() {
            return Err(ApiError::validation("password must not be blank"));
        }
        if self.repos.roles.find(input.role_id).await?.is_none() {
            return Err(ApiError::not_found("role not found"));
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
                role_id: input.role_id,
                address: input.address,
                created_at: stamp,
                updated_at: stamp,
            })
            .await?;
        Ok(model.into())
    }

    pub async fn update(&self, id: Uuid, input: UpdateUser) -> Result<UserOut, ApiError> {
        let mut model = self
            .repos
            .users
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        if let Some(name) = input.name {
            model.name = require_field(&name, "name")?;
        }
        if let Some(email) = input.email {
            let email = require_field(&email, "email")?;
            if email != model.email {
                if self.repos.users.find_by_email(&email).await?.is_some() {
                    return Err(ApiError::conflict(
                        "a user with this email already exists",
                    ));
                }
                model.email = email;
            }
        }
        if let Some(password) = input.password {
            if password.is_empty() {
                return Err(ApiError::validation("password must not be blank"));
            }
            model.password_hash = hash_password(&password)?;
        }
        if let Some(role_id) = input.role_id {
            if self.repos.roles.find(role_id).await?.is_none() {
                return Err(ApiError::not_found("role not found"));
            }
            model.role_id = role_id;
        }
        if let Some(address) = input.address {
            model.address = Some(address);
        }
        Ok(self.repos.users.update(model).await?.into())
    }

    /// A user who created surveys cannot be removed; their enrollments and
    /// the responses under them go with the account.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repos.users.find(id).await?.is_none() {
            return Err(ApiError::not_found("user not found"));
        }
        if self.repos.surveys.any_for_creator(id).await? {
            return Err(ApiError::invalid_operation(
                "user has created surveys and cannot be deleted",
            ));
        }
        for enrollment in self.repos.enrollments.list_by_user(id).await? {
            self.repos
                .responses
                .delete_by_enrollment(enrollment.id)
                .await?;
            self.repos.enrollments.delete(enrollment.id).await?;
        }
        self.repos.users.delete(id).await
    }
}

fn require_field(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}
