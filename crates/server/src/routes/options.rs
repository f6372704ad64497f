use api::auth::CurrentUser;
use api::error::ApiError;
use api::services::option::{CreateOption, OptionOut, UpdateOption};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/bulk", post(create_bulk))
        .route("/by-question/{question_id}", get(list_by_question))
        .route("/{id}", get(get_one).put(update).delete(remove))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OptionOut>, ApiError> {
    Ok(Json(state.services.options.get(id).await?))
}

async fn list_by_question(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(question_id): Path<Uuid>,
) -> Result<Json<Vec<OptionOut>>, ApiError> {
    Ok(Json(state.services.options.list_by_question(question_id).await?))
}

async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateOption>,
) -> Result<(StatusCode, Json<OptionOut>), ApiError> {
    caller.require_admin()?;
    let option = state.services.options.create(input).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

async fn create_bulk(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(inputs): Json<Vec<CreateOption>>,
) -> Result<(StatusCode, Json<Vec<OptionOut>>), ApiError> {
    caller.require_admin()?;
    let options = state.services.options.create_bulk(inputs).await?;
    Ok((StatusCode::CREATED, Json(options)))
}

async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateOption>,
) -> Result<Json<OptionOut>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.services.options.update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.services.options.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
