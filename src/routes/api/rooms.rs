use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        patch::RoomPatch,
        room_service::{NewRoom, RoomView},
    },
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rooms", get(list).post(create))
        .route("/rooms/{id}", get(fetch).put(update).delete(remove))
}

async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewRoom>,
) -> ApiResult<RoomView> {
    let room = ServiceContext::from_state(state.as_ref())
        .room()
        .create(body)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Room created successfully", room)
}

async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<RoomView>> {
    let rooms = ServiceContext::from_state(state.as_ref())
        .room()
        .get_all()
        .await?;
    JsonApiResponse::ok(rooms)
}

async fn fetch(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<RoomView> {
    let room = ServiceContext::from_state(state.as_ref())
        .room()
        .get_by_id(id)
        .await?;
    JsonApiResponse::ok(room)
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<RoomPatch>,
) -> ApiResult<RoomView> {
    let room = ServiceContext::from_state(state.as_ref())
        .room()
        .update(id, patch)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Room updated successfully", room)
}

async fn remove(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .room()
        .delete(id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "Room deleted successfully", ())
}
