//! Browsing and folder creation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use arkiv_core::error::{AppError, ErrorKind};
use arkiv_core::types::pagination::{PageRequest, PageResponse};
use arkiv_core::types::sorting::SortBy;
use arkiv_database::repositories::node::NodeRepository;
use arkiv_entity::node::{NewNode, Node, NodeKind, ROOT_PATH};

use crate::context::RequestContext;

/// Orchestrates tree browsing, search, and folder creation.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Node repository.
    nodes: Arc<NodeRepository>,
}

/// Parameters for a browse/search call.
#[derive(Debug, Clone, Default)]
pub struct BrowseRequest {
    /// Materialized path of the folder to list (None for the root).
    pub folder: Option<String>,
    /// Search term; when present the folder filter is ignored and the
    /// whole tree is searched.
    pub search: Option<String>,
    /// Listing sort key.
    pub sort: SortBy,
    /// Page to fetch.
    pub page: PageRequest,
}

/// A browse/search result: the page of nodes, the folder it was resolved
/// against, and that folder's breadcrumb trail.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BrowseResult {
    /// The matching nodes.
    pub files: PageResponse<Node>,
    /// The folder the listing is anchored at.
    pub folder: Node,
    /// Ancestors from the root down to and including `folder`.
    pub ancestors: Vec<Node>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(nodes: Arc<NodeRepository>) -> Self {
        Self { nodes }
    }

    /// Lists a folder's children, or searches the whole tree.
    ///
    /// Supplying a search term deliberately ignores the folder filter:
    /// results come from anywhere in the owner's tree. The resolved
    /// folder and its ancestors are returned either way so the client
    /// can render the breadcrumb trail.
    pub async fn browse(
        &self,
        ctx: &RequestContext,
        req: BrowseRequest,
    ) -> Result<BrowseResult, AppError> {
        let folder = match req.folder.as_deref().map(normalize_path) {
            Some(path) if path != ROOT_PATH => self
                .nodes
                .find_by_path(ctx.user_id, &path)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Folder not found: {path}")))?,
            _ => self.nodes.find_root(ctx.user_id).await?,
        };

        let search = req.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let files = match search {
            Some(term) => {
                self.nodes
                    .search(ctx.user_id, term, req.sort, &req.page)
                    .await?
            }
            None => {
                self.nodes
                    .find_children(ctx.user_id, folder.id, req.sort, &req.page)
                    .await?
            }
        };

        let ancestors = self.nodes.find_ancestors(folder.id).await?;

        Ok(BrowseResult {
            files,
            folder,
            ancestors,
        })
    }

    /// Creates a folder under the given parent (the root when None).
    ///
    /// A live folder of the same name under the same parent rejects the
    /// call; a file of the same name does not.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> Result<Node, AppError> {
        let name = validate_node_name(name, "name")?;

        let mut tx = self.nodes.begin().await?;
        self.nodes.lock_owner_tree(&mut tx, ctx.user_id).await?;

        let parent = self.resolve_parent(ctx, parent_id).await?;

        if self
            .nodes
            .sibling_exists(&mut tx, parent.id, name, NodeKind::Folder)
            .await?
        {
            return Err(AppError::validation_field(
                "name",
                format!("Folder \"{name}\" already exists in this directory."),
            ));
        }

        let folder = self
            .nodes
            .append_child(&mut tx, &parent, &NewNode::folder(name))
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit folder", e)
        })?;

        info!(user_id = %ctx.user_id, folder_id = %folder.id, path = %folder.path, "Folder created");

        Ok(folder)
    }

    /// Soft-deletes a node in the caller's tree. Roots cannot be deleted.
    pub async fn delete_node(&self, ctx: &RequestContext, node_id: Uuid) -> Result<(), AppError> {
        let node = self
            .nodes
            .find_by_id(node_id)
            .await?
            .filter(|n| n.owner_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found("File or folder not found"))?;

        if node.is_root() {
            return Err(AppError::validation("The root folder cannot be deleted"));
        }

        self.nodes.soft_delete(node.id).await?;

        info!(user_id = %ctx.user_id, node_id = %node_id, "Node deleted");

        Ok(())
    }

    /// Resolves an upload/creation target folder, defaulting to the root.
    ///
    /// Nodes outside the caller's tree are invisible, so a foreign or
    /// dangling id reads as not-found rather than forbidden.
    pub(crate) async fn resolve_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Option<Uuid>,
    ) -> Result<Node, AppError> {
        match parent_id {
            Some(id) => {
                let node = self
                    .nodes
                    .find_by_id(id)
                    .await?
                    .filter(|n| n.owner_id == ctx.user_id)
                    .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
                if !node.is_folder() {
                    return Err(AppError::validation("Parent must be a folder"));
                }
                Ok(node)
            }
            None => self.nodes.find_root(ctx.user_id).await,
        }
    }
}

/// Normalize a client-supplied folder path: ensure a leading slash, strip
/// a trailing one, collapse empty to the root.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Reject empty names and names containing path separators.
pub(crate) fn validate_node_name<'a>(name: &'a str, field: &str) -> Result<&'a str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation_field(field, "Name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AppError::validation_field(
            field,
            "Name cannot contain path separators",
        ));
    }
    if name == "." || name == ".." {
        return Err(AppError::validation_field(field, "Invalid name"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_variants() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("docs"), "/docs");
        assert_eq!(normalize_path("/docs/reports/"), "/docs/reports");
        assert_eq!(normalize_path("  docs  "), "/docs");
    }

    #[test]
    fn test_validate_node_name() {
        assert_eq!(validate_node_name("  report.txt ", "name").unwrap(), "report.txt");
        assert!(validate_node_name("", "name").is_err());
        assert!(validate_node_name("a/b", "name").is_err());
        assert!(validate_node_name("..", "name").is_err());

        let err = validate_node_name("", "files").unwrap_err();
        assert_eq!(err.field.as_deref(), Some("files"));
    }
}
