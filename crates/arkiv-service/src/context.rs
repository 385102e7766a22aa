//! Request context carrying the authenticated user identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Extracted at the HTTP boundary and passed into service methods so that
/// every operation knows *who* is acting — there is no implicit global
/// current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's email (convenience field from token claims).
    pub email: String,
    /// The user's display name (convenience field from token claims).
    pub fullname: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, email: String, fullname: String) -> Self {
        Self {
            user_id,
            email,
            fullname,
            request_time: Utc::now(),
        }
    }
}
