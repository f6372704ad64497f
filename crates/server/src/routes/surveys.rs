use api::auth::CurrentUser;
use api::error::ApiError;
use api::services::survey::{CreateSurvey, SurveyOut, UpdateSurvey};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    _caller: CurrentUser,
) -> Result<Json<Vec<SurveyOut>>, ApiError> {
    Ok(Json(state.services.surveys.list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SurveyOut>, ApiError> {
    Ok(Json(state.services.surveys.get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateSurvey>,
) -> Result<(StatusCode, Json<SurveyOut>), ApiError> {
    caller.require_admin()?;
    let survey = state.services.surveys.create(input).await?;
    Ok((StatusCode::CREATED, Json(survey)))
}

async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSurvey>,
) -> Result<Json<SurveyOut>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.services.surveys.update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.services.surveys.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
