//! Account handlers: register, login, profile.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use arkiv_service::user::service::{LoginRequest, RegisterRequest};

use crate::dto::request::{LoginBody, RegisterBody, check};
use crate::dto::response::ok;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    check(&body)?;

    let authed = state
        .user_service
        .register(RegisterRequest {
            fullname: body.fullname,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok((StatusCode::CREATED, ok(authed)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check(&body)?;

    let authed = state
        .user_service
        .login(LoginRequest {
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(ok(authed))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.user_service.me(&auth).await?;
    Ok(ok(user))
}
