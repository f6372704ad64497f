use api::error::ApiError;
use api::services::auth::{LoginInput, LoginOutput, RegisterInput};
use api::services::user::UserOut;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    let user = state.services.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginOutput>, ApiError> {
    Ok(Json(state.services.auth.login(input).await?))
}
