// src/handlers/health.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;

/// Liveness check; also verifies that a pooled connection answers.
pub async fn health(State(pool): State<PgPool>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::warn!("Health check failed: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}
