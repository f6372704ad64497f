use api::auth::CurrentUser;
use api::error::ApiError;
use api::services::enrollment::{CreateEnrollment, EnrollmentOut};
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
        .route("/by-user/{user_id}", get(list_by_user))
        .route("/{id}", get(get_one).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    _caller: CurrentUser,
) -> Result<Json<Vec<EnrollmentOut>>, ApiError> {
    Ok(Json(state.services.enrollments.list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentOut>, ApiError> {
    Ok(Json(state.services.enrollments.get(id).await?))
}

async fn list_by_survey(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(survey_id): Path<Uuid>,
) -> Result<Json<Vec<EnrollmentOut>>, ApiError> {
    Ok(Json(state.services.enrollments.list_by_survey(survey_id).await?))
}

async fn list_by_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<EnrollmentOut>>, ApiError> {
    Ok(Json(state.services.enrollments.list_by_user(user_id).await?))
}

async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateEnrollment>,
) -> Result<(StatusCode, Json<EnrollmentOut>), ApiError> {
    caller.require_admin()?;
    let enrollment = state.services.enrollments.create(input).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.services.enrollments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
