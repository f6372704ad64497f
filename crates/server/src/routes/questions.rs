use api::auth::CurrentUser;
use api::error::ApiError;
use api::services::question::{CreateQuestion, QuestionOut, UpdateQuestion};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/by-survey/{survey_id}", get(list_by_survey))
        .route("/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    _caller: CurrentUser,
) -> Result<Json<Vec<QuestionOut>>, ApiError> {
    Ok(Json(state.services.questions.list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionOut>, ApiError> {
    Ok(Json(state.services.questions.get(id).await?))
}

async fn list_by_survey(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(survey_id): Path<Uuid>,
) -> Result<Json<Vec<QuestionOut>>, ApiError> {
    Ok(Json(state.services.questions.list_by_survey(survey_id).await?))
}

async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateQuestion>,
) -> Result<(StatusCode, Json<QuestionOut>), ApiError> {
    caller.require_admin()?;
    let question = state.services.questions.create(input).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateQuestion>,
) -> Result<Json<QuestionOut>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.services.questions.update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.services.questions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
