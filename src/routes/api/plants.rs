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
        patch::PlantPatch,
        plant_service::{NewPlant, PlantService, PlantView},
    },
    state::AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plants", get(list).post(create))
        .route("/plants/{id}", get(fetch).put(update).delete(remove))
}

fn plants(state: &AppState) -> PlantService {
    ServiceContext::from_state(state).plant()
}

async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPlant>,
) -> ApiResult<PlantView> {
    let plant = plants(&state).create(body).await?;
    JsonApiResponse::with_status(StatusCode::CREATED, "Plant created successfully", plant)
}

async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<PlantView>> {
    JsonApiResponse::ok(plants(&state).get_all().await?)
}

async fn fetch(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<PlantView> {
    JsonApiResponse::ok(plants(&state).get_by_id(id).await?)
}

// A `room` in the body moves the plant as part of the same update.
async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PlantPatch>,
) -> ApiResult<PlantView> {
    let plant = plants(&state).update(id, patch).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Plant updated successfully", plant)
}

async fn remove(State(state): State<Arc<AppState>>, Path(id): Path<Uuid>) -> ApiResult<()> {
    plants(&state).delete(id).await?;
    JsonApiResponse::with_status(StatusCode::OK, "Plant deleted successfully", ())
}
