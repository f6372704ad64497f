use chrono::Utc;
use entity::question::QuestionType;
use entity::question_option;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::repo::Repos;

#[derive(Debug, Deserialize)]
pub struct CreateOption {
    pub value: String,
    pub display_order: i32,
    pub question_id: Uuid,
}

/// Only the displayed value can change after creation; order and parent
/// question are fixed.
#[derive(Debug, Deserialize)]
pub struct UpdateOption {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct OptionOut {
    pub id: Uuid,
    pub value: String,
    pub display_order: i32,
    pub question_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<question_option::Model> for OptionOut {
    fn from(model: question_option::Model) -> Self {
        OptionOut {
            id: model.id,
            value: model.value,
            display_order: model.display_order,
            question_id: model.question_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct OptionService {
    repos: Repos,
}

impl OptionService {
    pub fn new(repos: Repos) -> Self {
        OptionService { repos }
    }

    pub async fn get(&self, id: Uuid) -> Result<OptionOut, ApiError> {
        self.repos
            .options
            .find(id)
            .await?
            .map(OptionOut::from)
            .ok_or_else(|| ApiError::not_found("option not found"))
    }

    pub async fn list_by_question(&self, question_id: Uuid) -> Result<Vec<OptionOut>, ApiError> {
        if self.repos.questions.find(question_id).await?.is_none() {
            return Err(ApiError::not_found("question not found"));
        }
        Ok(self
            .repos
            .options
            .list_by_question(question_id)
            .await?
            .into_iter()
            .map(OptionOut::from)
            .collect())
    }

    pub async fn create(&self, input: CreateOption) -> Result<OptionOut, ApiError> {
        self.check_question(input.question_id).await?;
        let model = self.repos.options.insert(to_model(&input)?).await?;
        Ok(model.into())
    }

    /// Bulk insert checks the target question once, against the first
    /// element of the batch; the remaining rows are taken as belonging to
    /// the same question.
    pub async fn create_bulk(
        &self,
        inputs: Vec<CreateOption>,
    ) -> Result<Vec<OptionOut>, ApiError> {
        let first = inputs
            .first()
            .ok_or_else(|| ApiError::invalid_operation("no options supplied"))?;
        self.check_question(first.question_id).await?;
        let models = inputs
            .iter()
            .map(to_model)
            .collect::<Result<Vec<_>, _>>()?;
        let inserted = self.repos.options.insert_many(models).await?;
        Ok(inserted.into_iter().map(OptionOut::from).collect())
    }

    pub async fn update(&self, id: Uuid, input: UpdateOption) -> Result<OptionOut, ApiError> {
        let mut model = self
            .repos
            .options
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("option not found"))?;
        model.value = non_blank_value(&input.value)?;
        Ok(self.repos.options.update(model).await?.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if self.repos.options.find(id).await?.is_none() {
            return Err(ApiError::not_found("option not found"));
        }
        if self.repos.responses.any_for_option(id).await? {
            return Err(ApiError::invalid_operation(
                "option has been selected in responses and cannot be deleted",
            ));
        }
        self.repos.options.delete(id).await
    }

    /// Options only make sense on choice questions.
    async fn check_question(&self, question_id: Uuid) -> Result<(), ApiError> {
        let question = self
            .repos
            .questions
            .find(question_id)
            .await?
            .ok_or_else(|| ApiError::not_found("question not found"))?;
        match question.question_type {
            QuestionType::Radio | QuestionType::Checkbox => Ok(()),
            QuestionType::Text | QuestionType::Rating => Err(ApiError::invalid_operation(
                "options can only be added to radio or checkbox questions",
            )),
        }
    }
}

fn to_model(input: &CreateOption) -> Result<question_option::Model, ApiError> {
    let stamp = Utc::now().into();
    Ok(question_option::Model {
        id: Uuid::new_v4(),
        value: non_blank_value(&input.value)?,
        display_order: input.display_order,
        question_id: input.question_id,
        created_at: stamp,
        updated_at: stamp,
    })
}

fn non_blank_value(value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("value must not be blank"));
    }
    Ok(trimmed.to_string())
}
