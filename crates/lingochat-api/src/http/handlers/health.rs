//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.db_pool.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check database ping failed");
        AppError::Unavailable("Database unavailable".to_string())
    })?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "connected",
        "notifications": state.conversations.notifications().is_enabled(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
