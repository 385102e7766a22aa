//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let database = arkiv_database::connection::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let storage = state.blob_store.health_check().await.unwrap_or(false);

    Ok(Json(serde_json::json!({
        "status": if database && storage { "ok" } else { "degraded" },
        "database": database,
        "storage": storage,
    })))
}
