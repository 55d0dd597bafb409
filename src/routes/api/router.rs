use std::sync::Arc;

use axum::{Router, middleware};

use crate::{middleware::require_identity, state::AppState};

use super::{auth, houses, plants, public, rooms, users};

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .merge(users::router())
        .merge(houses::router())
        .merge(rooms::router())
        .merge(plants::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_identity,
        ));

    Router::new()
        .merge(public::router())
        .merge(auth::router())
        .merge(protected)
        .with_state(state)
}
