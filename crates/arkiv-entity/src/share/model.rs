//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A permission grant on one file to one user.
///
/// A `(file_id, user_id)` pair holds at most one permission at a time;
/// re-sharing updates the existing row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: Uuid,
    /// The shared file node.
    pub file_id: Uuid,
    /// The grantee.
    pub user_id: Uuid,
    /// The granted permission.
    pub permission_id: Uuid,
    /// The user who created (or last updated) the grant.
    pub created_by: Uuid,
    /// When the share was first created.
    pub created_at: DateTime<Utc>,
    /// When the share was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to grant (or re-grant) a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShare {
    /// The shared file node.
    pub file_id: Uuid,
    /// The grantee.
    pub user_id: Uuid,
    /// The granted permission.
    pub permission_id: Uuid,
    /// The granting user.
    pub created_by: Uuid,
}

/// One grantee row in a file's share list, joined to user and
/// permission names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareRecipient {
    /// Grantee user id.
    pub user_id: Uuid,
    /// Grantee display name.
    pub fullname: String,
    /// Grantee email.
    pub email: String,
    /// Granted permission name.
    pub permission: String,
}

/// The owner identity surfaced alongside a file's share list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    /// Owner user id.
    pub id: Uuid,
    /// Owner display name.
    pub name: String,
    /// Owner email.
    pub email: String,
}

/// A file's complete share listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileShares {
    /// The shared file's id.
    pub file_id: Uuid,
    /// The shared file's name.
    pub file_name: String,
    /// The file's owner.
    pub owner: OwnerSummary,
    /// All grantees and their permission names.
    pub shares: Vec<ShareRecipient>,
}
