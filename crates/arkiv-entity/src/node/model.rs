//! Node entity model.
//!
//! Folders and files share one table and one entity. The hierarchy is
//! adjacency (`parent_id`) plus a materialized `path`; the per-user root
//! has no parent, path [`ROOT_PATH`] and depth 0, and never appears in
//! listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Materialized path of every per-user root node.
pub const ROOT_PATH: &str = "/";

/// Discriminates folder rows from file rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "node_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A folder; may have children.
    Folder,
    /// A file; carries blob metadata.
    File,
}

impl NodeKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = arkiv_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            _ => Err(arkiv_core::AppError::validation(format!(
                "Invalid node kind: '{s}'"
            ))),
        }
    }
}

/// The per-kind payload of a node.
///
/// File-only attributes live inside the `File` variant, so a folder can
/// never carry a dangling `blob_path` and a file always has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeVariant {
    /// A folder node.
    Folder,
    /// A file node and its blob metadata.
    File {
        /// MIME type reported at upload time.
        mime_type: Option<String>,
        /// Content size in bytes.
        size_bytes: i64,
        /// Opaque path returned by the blob store.
        blob_path: String,
    },
}

/// A node in a user's storage tree: a folder or a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: Uuid,
    /// The user whose tree this node belongs to.
    pub owner_id: Uuid,
    /// Parent node (None only for the per-user root).
    pub parent_id: Option<Uuid>,
    /// Node name (file names include the extension).
    pub name: String,
    /// Full materialized path within the owner's tree.
    pub path: String,
    /// Depth in the tree (0 for the root).
    pub depth: i32,
    /// Folder/file payload.
    #[serde(flatten)]
    pub variant: NodeVariant,
    /// Soft-delete marker; live rows have None.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Check if this is the per-user root (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self.variant, NodeVariant::Folder)
    }

    /// The kind discriminant of this node.
    pub fn kind(&self) -> NodeKind {
        match self.variant {
            NodeVariant::Folder => NodeKind::Folder,
            NodeVariant::File { .. } => NodeKind::File,
        }
    }

    /// The blob path, for file nodes.
    pub fn blob_path(&self) -> Option<&str> {
        match &self.variant {
            NodeVariant::Folder => None,
            NodeVariant::File { blob_path, .. } => Some(blob_path),
        }
    }

    /// The content size in bytes, for file nodes.
    pub fn size_bytes(&self) -> Option<i64> {
        match &self.variant {
            NodeVariant::Folder => None,
            NodeVariant::File { size_bytes, .. } => Some(*size_bytes),
        }
    }

    /// The MIME type, for file nodes.
    pub fn mime_type(&self) -> Option<&str> {
        match &self.variant {
            NodeVariant::Folder => None,
            NodeVariant::File { mime_type, .. } => mime_type.as_deref(),
        }
    }
}

impl FromRow<'_, PgRow> for Node {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let kind: NodeKind = row.try_get("kind")?;
        let variant = match kind {
            NodeKind::Folder => NodeVariant::Folder,
            NodeKind::File => NodeVariant::File {
                mime_type: row.try_get("mime_type")?,
                size_bytes: row.try_get::<Option<i64>, _>("size_bytes")?.unwrap_or(0),
                blob_path: row.try_get::<Option<String>, _>("blob_path")?.ok_or_else(
                    || sqlx::Error::ColumnDecode {
                        index: "blob_path".into(),
                        source: "file node row is missing blob_path".into(),
                    },
                )?,
            },
        };

        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            parent_id: row.try_get("parent_id")?,
            name: row.try_get("name")?,
            path: row.try_get("path")?,
            depth: row.try_get("depth")?,
            variant,
            deleted_at: row.try_get("deleted_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Data required to append a new node under a parent.
///
/// `path` and `depth` are derived from the parent at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNode {
    /// Node name.
    pub name: String,
    /// Folder/file payload.
    pub variant: NodeVariant,
}

impl NewNode {
    /// A new folder node.
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: NodeVariant::Folder,
        }
    }

    /// A new file node.
    pub fn file(
        name: impl Into<String>,
        mime_type: Option<String>,
        size_bytes: i64,
        blob_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            variant: NodeVariant::File {
                mime_type,
                size_bytes,
                blob_path: blob_path.into(),
            },
        }
    }

    /// The kind discriminant of the node to be created.
    pub fn kind(&self) -> NodeKind {
        match self.variant {
            NodeVariant::Folder => NodeKind::Folder,
            NodeVariant::File { .. } => NodeKind::File,
        }
    }

    /// The MIME type, for file nodes.
    pub fn mime_type(&self) -> Option<&str> {
        match &self.variant {
            NodeVariant::Folder => None,
            NodeVariant::File { mime_type, .. } => mime_type.as_deref(),
        }
    }

    /// The content size in bytes, for file nodes.
    pub fn size_bytes(&self) -> Option<i64> {
        match &self.variant {
            NodeVariant::Folder => None,
            NodeVariant::File { size_bytes, .. } => Some(*size_bytes),
        }
    }

    /// The blob path, for file nodes.
    pub fn blob_path(&self) -> Option<&str> {
        match &self.variant {
            NodeVariant::Folder => None,
            NodeVariant::File { blob_path, .. } => Some(blob_path),
        }
    }
}

/// Join a child name onto a parent's materialized path.
pub fn child_path(parent_path: &str, name: &str) -> String {
    if parent_path == ROOT_PATH {
        format!("/{name}")
    } else {
        format!("{parent_path}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_path_from_root() {
        assert_eq!(child_path(ROOT_PATH, "docs"), "/docs");
    }

    #[test]
    fn test_child_path_nested() {
        assert_eq!(child_path("/docs/reports", "q3.pdf"), "/docs/reports/q3.pdf");
    }

    #[test]
    fn test_variant_accessors() {
        let file = NewNode::file("a.txt", Some("text/plain".into()), 42, "files/u/a");
        assert_eq!(file.kind(), NodeKind::File);

        let folder = NewNode::folder("docs");
        assert_eq!(folder.kind(), NodeKind::Folder);
    }

    #[test]
    fn test_serde_flattens_kind() {
        let node = Node {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            parent_id: Some(Uuid::new_v4()),
            name: "a.txt".into(),
            path: "/a.txt".into(),
            depth: 1,
            variant: NodeVariant::File {
                mime_type: Some("text/plain".into()),
                size_bytes: 10,
                blob_path: "files/u/x".into(),
            },
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["kind"], "file");
        assert_eq!(json["size_bytes"], 10);

        let folder_json = serde_json::to_value(&Node {
            variant: NodeVariant::Folder,
            name: "docs".into(),
            path: "/docs".into(),
            ..node
        })
        .expect("serialize");
        assert_eq!(folder_json["kind"], "folder");
        assert!(folder_json.get("blob_path").is_none());
    }
}
