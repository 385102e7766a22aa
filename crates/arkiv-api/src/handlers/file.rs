//! File tree handlers: browse/search, upload, delete, download.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use uuid::Uuid;

use arkiv_core::error::AppError;
use arkiv_core::types::sorting::SortBy;
use arkiv_service::file::service::BrowseRequest;

use crate::dto::request::BrowseQuery;
use crate::dto::response::{ok, ok_with_message};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::multipart::read_upload;
use crate::state::AppState;

/// GET /api/files?folder=...&search=...&sort_by=...&page=...&per_page=...
///
/// Lists the folder's children, or searches the whole tree when a search
/// term is present. The response carries the listing, the resolved
/// folder, and its breadcrumb ancestors.
pub async fn browse(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<BrowseQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sort = query
        .sort_by
        .as_deref()
        .map(SortBy::parse)
        .unwrap_or_default();

    let result = state
        .file_service
        .browse(
            &auth,
            BrowseRequest {
                folder: query.folder,
                search: query.search,
                sort,
                page: pagination.into_page_request(),
            },
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "files": result.files,
            "folder": result.folder,
            "ancestors": result.ancestors,
        }
    })))
}

/// POST /api/files/upload — multipart upload.
///
/// Plain `files` parts upload flat into the target folder; bracketed
/// `file_tree[...]` parts recreate a whole directory tree.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let body = read_upload(multipart).await?;

    let created = if body.has_tree() {
        state
            .upload_service
            .upload_tree(&auth, body.parent_id, body.tree)
            .await?
    } else {
        state
            .upload_service
            .upload_files(&auth, body.parent_id, body.files)
            .await?
    };

    Ok((
        StatusCode::CREATED,
        ok_with_message("Files uploaded successfully", created),
    ))
}

/// GET /api/files/{id}/download — stream a file's content.
pub async fn download(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let node = state.share_service.resolve_accessible_file(&auth, id).await?;

    let blob_path = node
        .blob_path()
        .ok_or_else(|| AppError::validation("Folders cannot be downloaded"))?;
    let stream = state.blob_store.read(blob_path).await?;

    let content_type = node
        .mime_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", node.name),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// DELETE /api/files/{id} — soft-delete a file or folder.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.file_service.delete_node(&auth, id).await?;
    Ok(ok(serde_json::json!({ "message": "Deleted" })))
}
