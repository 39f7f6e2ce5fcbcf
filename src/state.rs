// src/state.rs

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::config::Config;

/// Shared by every handler; each one extracts only the pool or the config it needs.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app: &AppState) -> Self {
        app.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(app: &AppState) -> Self {
        app.config.clone()
    }
}
