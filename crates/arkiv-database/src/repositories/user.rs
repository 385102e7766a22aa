//! User repository implementation.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use arkiv_core::error::{AppError, ErrorKind};
use arkiv_core::result::AppResult;
use arkiv_entity::user::{NewUser, User};

/// Unique index guarding case-insensitive email uniqueness.
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Repository for user CRUD and lookups.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction (used to create a user and their root node
    /// atomically).
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Create a new user inside the caller's transaction.
    pub async fn create(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        data: &NewUser,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (fullname, email, password_hash) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.fullname)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => {
                AppError::validation_field(
                    "email",
                    format!("An account with email \"{}\" already exists", data.email),
                )
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }
}
