use std::sync::Arc;

use api::auth::AuthConfig;
use api::services::Services;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub auth: Arc<AuthConfig>,
}

// Lets the CurrentUser extractor pull the auth config out of our state.
impl FromRef<AppState> for Arc<AuthConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
