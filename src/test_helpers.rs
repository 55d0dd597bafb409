//! Fixtures shared by unit tests and the route tests under `tests/`.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Transaction, Value};
use uuid::Uuid;

use crate::{
    auth::TokenService,
    config::{AppConfig, AuthConfig},
    db::entities::{CareLevel, Level, house, plant, room, user, user::RoleSet},
    routes::router,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret-0123456789abcdef";

pub fn fixed_ts() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}

/// SQL of the first logged statement starting with `verb`, and the timestamps it binds.
pub fn timestamps_written_by(
    log: &[Transaction],
    verb: &str,
) -> (String, Vec<DateTime<FixedOffset>>) {
    let statement = log
        .iter()
        .flat_map(|txn| txn.statements())
        .find(|stmt| stmt.sql.starts_with(verb))
        .expect("statement should be logged");
    let stamps = statement
        .values
        .iter()
        .flat_map(|values| values.0.iter())
        .filter_map(|value| match value {
            Value::ChronoDateTimeWithTimeZone(Some(at)) => Some(*at),
            _ => None,
        })
        .collect();
    (statement.sql.clone(), stamps)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        auth: Some(AuthConfig::new(TEST_JWT_SECRET)),
        ..AppConfig::default()
    }
}

pub fn test_tokens() -> TokenService {
    TokenService::new(&AuthConfig::new(TEST_JWT_SECRET))
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(test_config(), db, test_tokens())
}

/// The full router over `db`, with tokens signed by [`TEST_JWT_SECRET`].
pub fn test_router(db: DatabaseConnection) -> Router {
    router(test_state(db))
}

/// A router whose store must never be reached.
pub fn empty_router() -> Router {
    test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
}

/// `Authorization` value for `user_id`.
pub fn bearer(user_id: Uuid) -> String {
    let issued = test_tokens()
        .issue(user_id)
        .expect("test token should encode");
    format!("Bearer {}", issued.token)
}

pub fn user_model(id: Uuid, email: &str) -> user::Model {
    let now = fixed_ts();
    user::Model {
        id,
        created_at: now,
        updated_at: now,
        email: email.to_string(),
        password_hash: "hash".to_string(),
        username: None,
        first_name: None,
        last_name: None,
        bio: None,
        phone_number: None,
        profile_picture: None,
        roles: RoleSet::default(),
        active: true,
        last_login_at: None,
    }
}

pub fn house_model(id: Uuid) -> house::Model {
    let now = fixed_ts();
    house::Model {
        id,
        created_at: now,
        updated_at: now,
        name: "Cabin".to_string(),
        location: "Lakeside".to_string(),
        description: None,
    }
}

pub fn room_model(id: Uuid) -> room::Model {
    let now = fixed_ts();
    room::Model {
        id,
        created_at: now,
        updated_at: now,
        name: "Kitchen".to_string(),
        room_type: "kitchen".to_string(),
        humidity: Level::Medium,
        air_conditioner: false,
        radiator: true,
        light: Level::High,
    }
}

pub fn plant_model(id: Uuid, room_id: Uuid) -> plant::Model {
    let now = fixed_ts();
    plant::Model {
        id,
        created_at: now,
        updated_at: now,
        name: "Fern".to_string(),
        scientific_name: None,
        species: None,
        description: None,
        image_url: None,
        water_frequency: 3,
        sunlight: CareLevel::Low,
        temperature_min: None,
        temperature_max: None,
        humidity: None,
        fertilizing_frequency: None,
        last_watered: None,
        last_fertilized: None,
        last_repotted: None,
        date_acquired: None,
        notes: None,
        room_id,
        is_alive: true,
    }
}
