//! Permission lookup handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::ok;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let permissions = state.permission_repo.find_all().await?;
    Ok(ok(permissions))
}
