//! Folder creation handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{CreateFolderBody, check};
use crate::dto::response::ok_with_message;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateFolderBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    check(&body)?;

    let folder = state
        .file_service
        .create_folder(&auth, body.parent_id, &body.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        ok_with_message("Folder created successfully", folder),
    ))
}
