use api::auth::CurrentUser;
use api::error::ApiError;
use api::services::product::{CreateProduct, ProductOut, UpdateProduct};
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
) -> Result<Json<Vec<ProductOut>>, ApiError> {
    Ok(Json(state.services.products.list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductOut>, ApiError> {
    Ok(Json(state.services.products.get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateProduct>,
) -> Result<(StatusCode, Json<ProductOut>), ApiError> {
    caller.require_admin()?;
    let product = state.services.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProduct>,
) -> Result<Json<ProductOut>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.services.products.update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
