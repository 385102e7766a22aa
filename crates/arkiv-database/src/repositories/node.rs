//! Node repository: the tree node store.
//!
//! All queries scope by owner and skip soft-deleted rows. Mutations run
//! inside a caller-held transaction; [`NodeRepository::lock_owner_tree`]
//! serializes concurrent appends under one owner's tree.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use arkiv_core::error::{AppError, ErrorKind};
use arkiv_core::result::AppResult;
use arkiv_core::types::pagination::{PageRequest, PageResponse};
use arkiv_core::types::sorting::SortBy;
use arkiv_entity::node::{NewNode, Node, NodeKind, ROOT_PATH, child_path};

/// Unique index guarding live sibling names per kind.
const SIBLING_NAME_CONSTRAINT: &str = "nodes_sibling_name_key";
/// Unique index guarding one live root per owner.
const OWNER_ROOT_CONSTRAINT: &str = "nodes_owner_root_key";

/// Repository for tree node CRUD, listing, search, and ancestor queries.
#[derive(Debug, Clone)]
pub struct NodeRepository {
    pool: PgPool,
}

impl NodeRepository {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction for a tree mutation.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }

    /// Serialize tree mutations for one owner.
    ///
    /// Takes a transaction-scoped advisory lock keyed on the owner id, so
    /// concurrent appends under the same owner's tree queue up behind each
    /// other. Released automatically at commit/rollback.
    pub async fn lock_owner_tree(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        owner_id: Uuid,
    ) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(owner_id.to_string())
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock owner tree", e)
            })?;
        Ok(())
    }

    /// Find a live node by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    /// The unique live root node for an owner.
    pub async fn find_root(&self, owner_id: Uuid) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "SELECT * FROM nodes \
             WHERE owner_id = $1 AND parent_id IS NULL AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find root node", e))?
        .ok_or_else(|| AppError::not_found("Root folder not found for this account"))
    }

    /// Resolve a live node by its materialized path, scoped to the owner.
    pub async fn find_by_path(&self, owner_id: Uuid, path: &str) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(
            "SELECT * FROM nodes WHERE owner_id = $1 AND path = $2 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node by path", e))
    }

    /// Page of live direct children of a folder.
    ///
    /// Folders order before files, then the requested sort key, then
    /// newest-created first, then highest id. Root nodes never appear
    /// (they have no parent and so never match `parent_id = $2`).
    pub async fn find_children(
        &self,
        owner_id: Uuid,
        parent_id: Uuid,
        sort: SortBy,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Node>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM nodes \
             WHERE owner_id = $1 AND parent_id = $2 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count children", e))?;

        let query = format!(
            "SELECT * FROM nodes \
             WHERE owner_id = $1 AND parent_id = $2 AND deleted_at IS NULL \
             {} LIMIT $3 OFFSET $4",
            sort.order_clause()
        );
        let nodes = sqlx::query_as::<_, Node>(&query)
            .bind(owner_id)
            .bind(parent_id)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))?;

        Ok(PageResponse::new(
            nodes,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Page of live nodes anywhere in the owner's tree whose name contains
    /// the term, case-insensitively. Roots are excluded; ordering matches
    /// [`find_children`].
    pub async fn search(
        &self,
        owner_id: Uuid,
        term: &str,
        sort: SortBy,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Node>> {
        let pattern = format!("%{}%", escape_like(term));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM nodes \
             WHERE owner_id = $1 AND parent_id IS NOT NULL \
               AND name ILIKE $2 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count search results", e)
        })?;

        let query = format!(
            "SELECT * FROM nodes \
             WHERE owner_id = $1 AND parent_id IS NOT NULL \
               AND name ILIKE $2 AND deleted_at IS NULL \
             {} LIMIT $3 OFFSET $4",
            sort.order_clause()
        );
        let nodes = sqlx::query_as::<_, Node>(&query)
            .bind(owner_id)
            .bind(&pattern)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search nodes", e))?;

        Ok(PageResponse::new(
            nodes,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Ancestor chain from the root down to (and including) the node.
    pub async fn find_ancestors(&self, node_id: Uuid) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT * FROM nodes WHERE id = $1 \
                UNION ALL \
                SELECT n.* FROM nodes n INNER JOIN ancestors a ON n.id = a.parent_id \
             ) SELECT * FROM ancestors ORDER BY depth ASC",
        )
        .bind(node_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    /// Check for a live sibling of the same name and kind under a parent.
    ///
    /// Soft-deleted rows do not count, and a folder can share a name with
    /// a file under the same parent.
    pub async fn sibling_exists(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        parent_id: Uuid,
        name: &str,
        kind: NodeKind,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS ( \
                SELECT 1 FROM nodes \
                WHERE parent_id = $1 AND name = $2 AND kind = $3 AND deleted_at IS NULL \
             )",
        )
        .bind(parent_id)
        .bind(name)
        .bind(kind)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check sibling name", e)
        })?;
        Ok(exists)
    }

    /// Find a live child folder by exact name, inside a transaction.
    ///
    /// Used by tree uploads to reuse an existing folder instead of
    /// creating a duplicate.
    pub async fn find_child_folder(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        parent_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(
            "SELECT * FROM nodes \
             WHERE parent_id = $1 AND name = $2 AND kind = 'folder' AND deleted_at IS NULL",
        )
        .bind(parent_id)
        .bind(name)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find child folder", e))
    }

    /// Insert a node as a child of the given parent.
    ///
    /// The materialized path and depth are derived from the parent here,
    /// inside the caller's transaction, so a failed sibling insert rolls
    /// the whole top-level operation back.
    pub async fn append_child(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        parent: &Node,
        new: &NewNode,
    ) -> AppResult<Node> {
        let path = child_path(&parent.path, &new.name);
        let depth = parent.depth + 1;

        sqlx::query_as::<_, Node>(
            "INSERT INTO nodes \
                (owner_id, parent_id, name, path, depth, kind, mime_type, size_bytes, blob_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(parent.owner_id)
        .bind(parent.id)
        .bind(&new.name)
        .bind(&path)
        .bind(depth)
        .bind(new.kind())
        .bind(new.mime_type())
        .bind(new.size_bytes())
        .bind(new.blob_path())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.constraint() == Some(SIBLING_NAME_CONSTRAINT) =>
            {
                AppError::conflict(format!(
                    "A {} named \"{}\" already exists in this directory",
                    new.kind(),
                    new.name
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to append node", e),
        })
    }

    /// Create the root folder for a new owner.
    pub async fn create_root(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        owner_id: Uuid,
    ) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "INSERT INTO nodes (owner_id, parent_id, name, path, depth, kind) \
             VALUES ($1, NULL, 'root', $2, 0, 'folder') RETURNING *",
        )
        .bind(owner_id)
        .bind(ROOT_PATH)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some(OWNER_ROOT_CONSTRAINT) => {
                AppError::conflict("Root folder already exists for this account")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create root node", e),
        })
    }

    /// Soft-delete a node. This layer never hard-deletes.
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE nodes SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete node", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}

/// Escape `%` and `_` so a search term matches literally inside ILIKE.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_literalizes_wildcards() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
