use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{auth::TokenService, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, tokens: TokenService) -> Arc<Self> {
        Arc::new(Self { config, db, tokens })
    }
}
