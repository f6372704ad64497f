use chrono::Utc;
use entity::{question, response, user_survey};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::repo::Repos;
use crate::validation::{validate_answer, AnswerInput, ValidatedAnswer};

#[derive(Debug, Deserialize)]
pub struct CreateResponse {
    pub user_survey_id: Uuid,
    pub question_id: Uuid,
    #[serde(default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub option_ids: Vec<Uuid>,
}

/// An update may retarget the answer at a different question of the same
/// survey; validation then runs against that question's type.
#[derive(Debug, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub question_id: Option<Uuid>,
    #[serde(default)]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub option_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ResponseOut {
    pub id: Uuid,
    pub user_survey_id: Uuid,
    pub question_id: Uuid,
    pub rating: Option<i32>,
    pub feedback_text: Option<String>,
    pub option_ids: Vec<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl ResponseOut {
    fn assemble(model: response::Model, option_ids: Vec<Uuid>) -> Self {
        ResponseOut {
            id: model.id,
            user_survey_id: model.user_survey_id,
            question_id: model.question_id,
            rating: model.rating,
            feedback_text: model.feedback_text,
            option_ids,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct ResponseService {
    repos: Repos,
}

impl ResponseService {
    pub fn new(repos: Repos) -> Self {
        ResponseService { repos }
    }

    pub async fn list(&self) -> Result<Vec<ResponseOut>, ApiError> {
        let mut out = Vec::new();
        for model in self.repos.responses.list().await? {
            let option_ids = self.repos.responses.option_ids(model.id).await?;
            out.push(ResponseOut::assemble(model, option_ids));
        }
        Ok(out)
    }

    pub async fn get(&self, id: Uuid) -> Result<ResponseOut, ApiError> {
        let model = self
            .repos
            .responses
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("response not found"))?;
        let option_ids = self.repos.responses.option_ids(model.id).await?;
        Ok(ResponseOut::assemble(model, option_ids))
    }

    pub async fn create(
        &self,
        caller: &CurrentUser,
        input: CreateResponse,
    ) -> Result<ResponseOut, ApiError> {
        let enrollment = self.find_enrollment(input.user_survey_id).await?;
        self.check_ownership(caller, &enrollment)?;
        let question = self
            .find_question_in_survey(input.question_id, enrollment.survey_id)
            .await?;
        let answer = self
            .validate(
                &question,
                AnswerInput {
                    feedback_text: input.feedback_text,
                    rating: input.rating,
                    option_ids: input.option_ids,
                },
            )
            .await?;
        let stamp = Utc::now().into();
        let model = self
            .repos
            .responses
            .insert(
                response::Model {
                    id: Uuid::new_v4(),
                    user_survey_id: enrollment.id,
                    question_id: question.id,
                    rating: answer.rating,
                    feedback_text: answer.feedback_text.clone(),
                    created_at: stamp,
                    updated_at: stamp,
                },
                &answer.option_ids,
            )
            .await?;
        Ok(ResponseOut::assemble(model, answer.option_ids))
    }

    pub async fn update(
        &self,
        caller: &CurrentUser,
        id: Uuid,
        input: UpdateResponse,
    ) -> Result<ResponseOut, ApiError> {
        let mut model = self
            .repos
            .responses
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("response not found"))?;
        let enrollment = self.find_enrollment(model.user_survey_id).await?;
        self.check_ownership(caller, &enrollment)?;
        let question = self
            .find_question_in_survey(
                input.question_id.unwrap_or(model.question_id),
                enrollment.survey_id,
            )
            .await?;
        let answer = self
            .validate(
                &question,
                AnswerInput {
                    feedback_text: input.feedback_text,
                    rating: input.rating,
                    option_ids: input.option_ids,
                },
            )
            .await?;
        model.question_id = question.id;
        model.rating = answer.rating;
        model.feedback_text = answer.feedback_text.clone();
        let updated = self
            .repos
            .responses
            .update(model, &answer.option_ids)
            .await?;
        Ok(ResponseOut::assemble(updated, answer.option_ids))
    }

    pub async fn delete(&self, caller: &CurrentUser, id: Uuid) -> Result<(), ApiError> {
        let model = self
            .repos
            .responses
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("response not found"))?;
        let enrollment = self.find_enrollment(model.user_survey_id).await?;
        self.check_ownership(caller, &enrollment)?;
        self.repos.responses.delete(id).await
    }

    async fn find_enrollment(&self, id: Uuid) -> Result<user_survey::Model, ApiError> {
        self.repos
            .enrollments
            .find(id)
            .await?
            .ok_or_else(|| ApiError::not_found("enrollment not found"))
    }

    /// Respondents may only touch responses recorded under their own
    /// enrollment; administrators may touch any.
    fn check_ownership(
        &self,
        caller: &CurrentUser,
        enrollment: &user_survey::Model,
    ) -> Result<(), ApiError> {
        if caller.is_admin() || enrollment.user_id == caller.user_id {
            Ok(())
        } else {
            Err(ApiError::invalid_operation(
                "cannot modify a response under another user's enrollment",
            ))
        }
    }

    async fn find_question_in_survey(
        &self,
        question_id: Uuid,
        survey_id: Uuid,
    ) -> Result<question::Model, ApiError> {
        let question = self
            .repos
            .questions
            .find(question_id)
            .await?
            .ok_or_else(|| ApiError::not_found("question not found"))?;
        if question.survey_id != survey_id {
            return Err(ApiError::invalid_operation(
                "question does not belong to the enrollment's survey",
            ));
        }
        Ok(question)
    }

    /// Shape validation plus a referential check that every selected option
    /// actually belongs to the question being answered.
    async fn validate(
        &self,
        question: &question::Model,
        input: AnswerInput,
    ) -> Result<ValidatedAnswer, ApiError> {
        let answer = validate_answer(question.question_type, &input)?;
        for option_id in &answer.option_ids {
            let belongs = self
                .repos
                .options
                .find(*option_id)
                .await?
                .map(|option| option.question_id == question.id)
                .unwrap_or(false);
            if !belongs {
                return Err(ApiError::validation(
                    "option_id does not belong to this question",
                ));
            }
        }
        Ok(answer)
    }
}
