use chrono::Utc;
use entity::question::{self, QuestionType};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repo::Repos;

#[derive(Debug, Deserialize)]
pub struct CreateQuestion {
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub is_mandatory: bool,
    pub survey_id: Uuid,
}

/// The question's type and survey are fixed at creation; an update may
/// only reword the question and toggle the mandatory flag.
#[derive(Debug, Deserialize)]
pub struct UpdateQuestion {
    pub text: String,
    #[serde(default)]
    pub is_mandatory: bool,
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub is_mandatory: bool,
    pub survey_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<question::Model> for QuestionOut {
    fn from(model: question::Model) -> Self {
        QuestionOut {
            id: model.id,
            text: model.text,
            question_type: model.question_type,
            is_mandatory: model.is_mandatory,
            survey_id: model.survey_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct QuestionService {
    repos: Repos,
}

impl QuestionService {
    pub fn new(repos: Repos) -> Self {
        QuestionService { repos }
    }

    pub async fn list(&self) -> Result<Vec<QuestionOut>, ApiError> {
        Ok(self
            .repos
            .questions
            .list()
            .await?
            .into_iter()
            .map(QuestionOut::from)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<QuestionOut, ApiError> {
        self.repos
            .questions
            .find(id)
            .await?
            .map(QuestionOut::from)
            .ok_or_else(|| ApiError::not_found("question not found"))
    }

    pub async fn list_by_survey(&self, survey_id: Uuid) -> Result<Vec<QuestionOut>, ApiError> {
        if !self.repos.surveys.exists(survey_id).await? {
            return Err(ApiError::not_found("survey not found"));
        }
        Ok(self
            .repos
            .questions
            .list_by_survey(survey_id)
            .await?
            .into_iter()
            .map(QuestionOut::from)
            .collect())
    }

    pub async fn create(&self, input: CreateQuestion) -> Result<QuestionOut, ApiError> {
        let text = non_blank_text(&input.text)?;
        if !self.repos.surveys.exists(input.survey_id).await? {
            return Err(ApiError::not_found("survey not found"));
        }
        let stamp = Utc::now().into();
        let model = self
            .repos
            .questions
            .insert(question::Model {
                id: Uuid::new_v4(),
                text,
                question_type: input.question_type,
                is_mandatory: input.is_mandatory,
                survey_id: input.survey_id,
                created_at: stamp,
                updated_at: stamp,
            })
            .await?;
        Ok(model.into())
    }

    pub async fn update(&self, id: Uuid, input: UpdateQuestion) -> Result<QuestionOut, ApiError> {
        let mut model = self
            .repos
            .questions
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("question not found"))?;
        model.text = non_blank_text(&input.text)?;
        model.is_mandatory = input.is_mandatory;
        Ok(self.repos.questions.update(model).await?.into())
    }

    /// Options go with the question; recorded responses block the delete.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repos.questions.find(id).await?.is_none() {
            return Err(ApiError::not_found("question not found"));
        }
        if self.repos.responses.any_for_question(id).await? {
            return Err(ApiError::invalid_operation(
                "question has recorded responses and cannot be deleted",
            ));
        }
        self.repos.options.delete_by_question(id).await?;
        self.repos.questions.delete(id).await
    }
}

fn non_blank_text(text: &str) -> Result<String, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("text must not be blank"));
    }
    Ok(trimmed.to_string())
}
