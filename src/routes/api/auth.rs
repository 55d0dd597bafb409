use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Deserialize;

use crate::{
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        auth_service::{LoginResult, RegisteredUser},
    },
    state::AppState,
};

// Missing fields deserialize as empty and are rejected by the credential store.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<RegisteredUser> {
    let services = ServiceContext::from_state(state.as_ref());
    let user = services
        .auth(&state.tokens)
        .register(&body.email, &body.password)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "User created", user)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<LoginResult> {
    let services = ServiceContext::from_state(state.as_ref());
    let result = services
        .auth(&state.tokens)
        .login(&body.email, &body.password)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Login successful", result)
}
