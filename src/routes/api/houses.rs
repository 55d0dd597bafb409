use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    auth::Identity,
    response::{ApiResult, JsonApiResponse},
    services::{
        ServiceContext,
        house_service::{HouseView, NewHouse},
        patch::HousePatch,
    },
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/houses", get(list).post(create))
        .route("/houses/{id}", get(fetch).put(update).delete(remove))
}

async fn create(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(body): Json<NewHouse>,
) -> ApiResult<HouseView> {
    let house = ServiceContext::from_state(state.as_ref())
        .house()
        .create(identity.user_id, body)
        .await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "House created successfully", house)
}

async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<HouseView>> {
    let houses = ServiceContext::from_state(state.as_ref())
        .house()
        .get_all()
        .await?;
    JsonApiResponse::ok(houses)
}

async fn fetch(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<HouseView> {
    let house = ServiceContext::from_state(state.as_ref())
        .house()
        .get_by_id(id)
        .await?;
    JsonApiResponse::ok(house)
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<HousePatch>,
) -> ApiResult<HouseView> {
    let house = ServiceContext::from_state(state.as_ref())
        .house()
        .update(id, patch)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "House updated successfully", house)
}

async fn remove(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<()> {
    ServiceContext::from_state(state.as_ref())
        .house()
        .delete(id)
        .await?;
    JsonApiResponse::with_status(StatusCode::OK, "House deleted successfully", ())
}
