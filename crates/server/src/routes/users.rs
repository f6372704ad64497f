use api::auth::CurrentUser;
use api::error::ApiError;
use api::services::user::{CreateUser, UpdateUser, UserOut};
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
    caller: CurrentUser,
) -> Result<Json<Vec<UserOut>>, ApiError> {
    caller.require_admin()?;
    Ok(Json(state.services.users.list().await?))
}

async fn get_one(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserOut>, ApiError> {
    Ok(Json(state.services.users.get(id).await?))
}

async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserOut>), ApiError> {
    caller.require_admin()?;
    let user = state.services.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// Respondents may edit their own account but never their role; both are
// open to administrators.
async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<UserOut>, ApiError> {
    if !caller.is_admin() {
        if caller.user_id != id {
            return Err(ApiError::unauthorized(
                "cannot update another user's account",
            ));
        }
        if input.role_id.is_some() {
            return Err(ApiError::unauthorized(
                "only an administrator can change roles",
            ));
        }
    }
    Ok(Json(state.services.users.update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
