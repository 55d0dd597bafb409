use std::sync::Arc;

use axum::{Router, routing::get};

use crate::{
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

async fn health() -> ApiResult<serde_json::Value> {
    JsonApiResponse::ok(serde_json::json!({ "ok": true }))
}
