//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A fixed permission level referenced by id from shares.
///
/// The set is small and seeded by migration (`view`, `edit`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Permission name.
    pub name: String,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}
