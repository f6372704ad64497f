use chrono::Utc;
use entity::survey;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repo::Repos;

#[derive(Debug, Deserialize)]
pub struct CreateSurvey {
    pub title: String,
    pub creator_user_id: Uuid,
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSurvey {
    pub title: String,
    pub product_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SurveyOut {
    pub id: Uuid,
    pub title: String,
    pub creator_user_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<survey::Model> for SurveyOut {
    fn from(model: survey::Model) -> Self {
        SurveyOut {
            id: model.id,
            title: model.title,
            creator_user_id: model.creator_user_id,
            product_id: model.product_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct SurveyService {
    repos: Repos,
}

impl SurveyService {
    pub fn new(repos: Repos) -> Self {
        SurveyService { repos }
    }

    pub async fn list(&self) -> Result<Vec<SurveyOut>, ApiError> {
        Ok(self
            .repos
            .surveys
            .list()
            .await?
            .into_iter()
            .map(SurveyOut::from)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<SurveyOut, ApiError> {
        self.repos
            .surveys
            .find(id)
            .await?
            .map(SurveyOut::from)
            .ok_or_else(|| ApiError::not_found("survey not found"))
    }

    pub async fn create(&self, input: CreateSurvey) -> Result<SurveyOut, ApiError> {
        let title = non_blank_title(&input.title)?;
        if self.repos.users.find(input.creator_user_id).await?.is_none() {
            return Err(ApiError::not_found("user not found"));
        }
        if self.repos.products.find(input.product_id).await?.is_none() {
            return Err(ApiError::not_found("product not found"));
        }
        let stamp = Utc::now().into();
        let model = self
            .repos
            .surveys
            .insert(survey::Model {
                id: Uuid::new_v4(),
                title,
                creator_user_id: input.creator_user_id,
                product_id: input.product_id,
                created_at: stamp,
                updated_at: stamp,
            })
            .await?;
        Ok(model.into())
    }

    pub async fn update(&self, id: Uuid, input: UpdateSurvey) -> Result<SurveyOut, ApiError> {
        let mut model = self
            .repos
            .surveys
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("survey not found"))?;
        model.title = non_blank_title(&input.title)?;
        if self.repos.products.find(input.product_id).await?.is_none() {
            return Err(ApiError::not_found("product not found"));
        }
        model.product_id = input.product_id;
        Ok(self.repos.surveys.update(model).await?.into())
    }

    /// Removing a survey takes its questions, options and enrollments with
    /// it, but never recorded responses: those block the delete.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repos.surveys.find(id).await?.is_none() {
            return Err(ApiError::not_found("survey not found"));
        }
        let enrollments = self.repos.enrollments.list_by_survey(id).await?;
        for enrollment in &enrollments {
            if self.repos.responses.any_for_enrollment(enrollment.id).await? {
                return Err(ApiError::invalid_operation(
                    "survey has recorded responses and cannot be deleted",
                ));
            }
        }
        for question in self.repos.questions.list_by_survey(id).await? {
            self.repos.options.delete_by_question(question.id).await?;
            self.repos.questions.delete(question.id).await?;
        }
        for enrollment in enrollments {
            self.repos.enrollments.delete(enrollment.id).await?;
        }
        self.repos.surveys.delete(id).await
    }
}

fn non_blank_title(title: &str) -> Result<String, ApiError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("title must not be blank"));
    }
    Ok(trimmed.to_string())
}
