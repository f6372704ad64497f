use chrono::Utc;
use entity::user_survey;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repo::Repos;

#[derive(Debug, Deserialize)]
pub struct CreateEnrollment {
    pub user_id: Uuid,
    pub survey_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentOut {
    pub id: Uuid,
    pub user_id: Uuid,
    pub survey_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<user_survey::Model> for EnrollmentOut {
    fn from(model: user_survey::Model) -> Self {
        EnrollmentOut {
            id: model.id,
            user_id: model.user_id,
            survey_id: model.survey_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct EnrollmentService {
    repos: Repos,
}

impl EnrollmentService {
    pub fn new(repos: Repos) -> Self {
        EnrollmentService { repos }
    }

    pub async fn list(&self) -> Result<Vec<EnrollmentOut>, ApiError> {
        Ok(self
            .repos
            .enrollments
            .list()
            .await?
            .into_iter()
            .map(EnrollmentOut::from)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<EnrollmentOut, ApiError> {
        self.repos
            .enrollments
            .find(id)
            .await?
            .map(EnrollmentOut::from)
            .ok_or_else(|| ApiError::not_found("enrollment not found"))
    }

    pub async fn list_by_survey(&self, survey_id: Uuid) -> Result<Vec<EnrollmentOut>, ApiError> {
        if !self.repos.surveys.exists(survey_id).await? {
            return Err(ApiError::not_found("survey not found"));
        }
        Ok(self
            .repos
            .enrollments
            .list_by_survey(survey_id)
            .await?
            .into_iter()
            .map(EnrollmentOut::from)
            .collect())
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<EnrollmentOut>, ApiError> {
        if self.repos.users.find(user_id).await?.is_none() {
            return Err(ApiError::not_found("user not found"));
        }
        Ok(self
            .repos
            .enrollments
            .list_by_user(user_id)
            .await?
            .into_iter()
            .map(EnrollmentOut::from)
            .collect())
    }

    /// Checks run in a fixed order: the user must exist, must not be an
    /// administrator, and the survey must exist. A caller sending both a
    /// missing user and a missing survey hears about the user.
    pub async fn create(&self, input: CreateEnrollment) -> Result<EnrollmentOut, ApiError> {
        let user = self
            .repos
            .users
            .find(input.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        if user.role_id == entity::role::ADMIN_ROLE_ID {
            return Err(ApiError::invalid_operation(
                "an administrator cannot be enrolled in a survey",
            ));
        }
        if !self.repos.surveys.exists(input.survey_id).await? {
            return Err(ApiError::not_found("survey not found"));
        }
        let already = self
            .repos
            .enrollments
            .list_by_user(input.user_id)
            .await?
            .iter()
            .any(|row| row.survey_id == input.survey_id);
        if already {
            return Err(ApiError::conflict(
                "user is already enrolled in this survey",
            ));
        }
        let stamp = Utc::now().into();
        let model = self
            .repos
            .enrollments
            .insert(user_survey::Model {
                id: Uuid::new_v4(),
                user_id: input.user_id,
                survey_id: input.survey_id,
                created_at: stamp,
                updated_at: stamp,
            })
            .await?;
        Ok(model.into())
    }

    /// Unenrolling a user drops their responses for that survey too.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repos.enrollments.find(id).await?.is_none() {
            return Err(ApiError::not_found("enrollment not found"));
        }
        self.repos.responses.delete_by_enrollment(id).await?;
        self.repos.enrollments.delete(id).await
    }
}
