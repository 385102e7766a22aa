//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for the local blob store.
    #[serde(default = "default_root")]
    pub root_path: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

fn default_root() -> String {
    "./data/blobs".to_string()
}

fn default_max_upload() -> u64 {
    // 100 MiB
    100 * 1024 * 1024
}
