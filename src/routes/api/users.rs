use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    auth::Identity,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, patch::UserPatch, user_service::UserView},
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/profile", get(profile))
        .route("/users/update", put(update))
}

async fn profile(State(state): State<Arc<AppState>>, identity: Identity) -> ApiResult<UserView> {
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .profile(identity.user_id)
        .await?;
    JsonApiResponse::ok(user)
}

async fn update(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(patch): Json<UserPatch>,
) -> ApiResult<UserView> {
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .update_profile(identity.user_id, patch)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Profile updated successfully", user)
}
