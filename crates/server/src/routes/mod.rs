//! HTTP surface. Each submodule owns one resource's routes; role checks
//! happen in the handlers, business rules in the service layer.

mod auth;
mod enrollments;
mod options;
mod products;
mod questions;
mod responses;
mod surveys;
mod users;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/surveys", surveys::router())
        .nest("/questions", questions::router())
        .nest("/options", options::router())
        .nest("/usersurveys", enrollments::router())
        .nest("/responses", responses::router())
        .nest("/users", users::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
