//! Share repository implementation.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use arkiv_core::error::{AppError, ErrorKind};
use arkiv_core::result::AppResult;
use arkiv_entity::share::{NewShare, Share, ShareRecipient};

/// Repository for share grants and per-file share listings.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction for a batch of grants.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }

    /// Grant or re-grant a share.
    ///
    /// One row per (file, user): an existing grant is updated in place
    /// with the new permission and grantor, whatever permission it held
    /// before.
    pub async fn upsert(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        share: &NewShare,
    ) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares (file_id, user_id, permission_id, created_by) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (file_id, user_id) DO UPDATE \
                SET permission_id = EXCLUDED.permission_id, \
                    created_by = EXCLUDED.created_by, \
                    updated_at = NOW() \
             RETURNING *",
        )
        .bind(share.file_id)
        .bind(share.user_id)
        .bind(share.permission_id)
        .bind(share.created_by)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert share", e))
    }

    /// All grantees of a file, joined to user and permission names.
    pub async fn find_for_file(&self, file_id: Uuid) -> AppResult<Vec<ShareRecipient>> {
        sqlx::query_as::<_, ShareRecipient>(
            "SELECT s.user_id, u.fullname, u.email, p.name AS permission \
             FROM shares s \
             INNER JOIN users u ON u.id = s.user_id \
             INNER JOIN permissions p ON p.id = s.permission_id \
             WHERE s.file_id = $1 \
             ORDER BY s.created_at ASC, u.email ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file shares", e))
    }

    /// Whether a user holds any share on a file.
    pub async fn exists_for(&self, file_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM shares WHERE file_id = $1 AND user_id = $2)",
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check share", e))?;
        Ok(exists)
    }
}
