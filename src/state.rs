// src/state.rs

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    services::{AttemptEngine, QuizCatalog},
};

/// Shared application state. Each manager owns a handle to the pool it was
/// built with; handlers pull out only the piece they need.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub catalog: QuizCatalog,
    pub attempts: AttemptEngine,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            catalog: QuizCatalog::new(pool.clone()),
            attempts: AttemptEngine::new(pool.clone()),
            pool,
            config,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for QuizCatalog {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for AttemptEngine {
    fn from_ref(state: &AppState) -> Self {
        state.attempts.clone()
    }
}
