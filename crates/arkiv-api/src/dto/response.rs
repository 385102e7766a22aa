//! Response envelope helpers.

use axum::Json;
use serde::Serialize;

/// Wrap a payload in the standard success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "data": data }))
}

/// Success envelope with a human-readable message alongside the payload.
pub fn ok_with_message<T: Serialize>(message: &str, data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "message": message, "data": data }))
}
