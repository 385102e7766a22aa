//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use arkiv_auth::jwt::JwtCodec;
use arkiv_auth::password::{PasswordHasher, PasswordPolicy};
use arkiv_core::config::AppConfig;
use arkiv_core::traits::blob::BlobStore;

use arkiv_database::repositories::node::NodeRepository;
use arkiv_database::repositories::permission::PermissionRepository;
use arkiv_database::repositories::share::ShareRepository;
use arkiv_database::repositories::user::UserRepository;

use arkiv_service::file::service::FileService;
use arkiv_service::file::upload::UploadService;
use arkiv_service::share::service::ShareService;
use arkiv_service::user::service::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Blob store collaborator.
    pub blob_store: Arc<dyn BlobStore>,
    /// Access token codec.
    pub jwt: Arc<JwtCodec>,

    /// Permission repository (lookup endpoint).
    pub permission_repo: Arc<PermissionRepository>,

    /// File tree service.
    pub file_service: Arc<FileService>,
    /// Upload service.
    pub upload_service: Arc<UploadService>,
    /// Share service.
    pub share_service: Arc<ShareService>,
    /// Account service.
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire up repositories and services over a pool and a blob store.
    pub fn build(config: AppConfig, db_pool: PgPool, blob_store: Arc<dyn BlobStore>) -> Self {
        let node_repo = Arc::new(NodeRepository::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let share_repo = Arc::new(ShareRepository::new(db_pool.clone()));
        let permission_repo = Arc::new(PermissionRepository::new(db_pool.clone()));

        let jwt = Arc::new(JwtCodec::new(&config.auth));
        let hasher = Arc::new(PasswordHasher::new());
        let policy = PasswordPolicy::new(&config.auth);

        let file_service = FileService::new(Arc::clone(&node_repo));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&node_repo),
            Arc::clone(&blob_store),
            file_service.clone(),
            config.storage.clone(),
        ));
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&share_repo),
            Arc::clone(&node_repo),
            Arc::clone(&user_repo),
            Arc::clone(&permission_repo),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&node_repo),
            hasher,
            policy,
            Arc::clone(&jwt),
        ));

        Self {
            config: Arc::new(config),
            db_pool,
            blob_store,
            jwt,
            permission_repo,
            file_service: Arc::new(file_service),
            upload_service,
            share_service,
            user_service,
        }
    }
}
