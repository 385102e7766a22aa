//! Share handlers: list a file's shares, grant shares.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use arkiv_service::share::service::GrantSharesRequest;

use crate::dto::request::{GrantSharesBody, check};
use crate::dto::response::{ok, ok_with_message};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/files/{id}/shares
pub async fn list_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let shares = state.share_service.list_shares(&auth, id).await?;
    Ok(ok(shares))
}

/// POST /api/files/{id}/shares
pub async fn grant_shares(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<GrantSharesBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check(&body)?;
    body.validate_emails()?;

    let granted = state
        .share_service
        .grant_shares(
            &auth,
            id,
            GrantSharesRequest {
                permission_id: body.permission_id,
                emails: body.emails,
            },
        )
        .await?;

    Ok(ok_with_message("File shared successfully.", granted))
}
