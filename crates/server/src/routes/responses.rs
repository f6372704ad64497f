use api::auth::{CurrentUser, UserRole};
use api::error::ApiError;
use api::services::response::{CreateResponse, ResponseOut, UpdateResponse};
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
) -> Result<Json<Vec<ResponseOut>>, ApiError> {
    Ok(Json(state.services.responses.list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResponseOut>, ApiError> {
    Ok(Json(state.services.responses.get(id).await?))
}

// Only respondents submit answers; administrators design surveys, they do
// not fill them in.
async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateResponse>,
) -> Result<(StatusCode, Json<ResponseOut>), ApiError> {
    caller.require_role(UserRole::User)?;
    let response = state.services.responses.create(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateResponse>,
) -> Result<Json<ResponseOut>, ApiError> {
    caller.require_role(UserRole::User)?;
    Ok(Json(state.services.responses.update(&caller, id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_role(UserRole::User)?;
    state.services.responses.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
