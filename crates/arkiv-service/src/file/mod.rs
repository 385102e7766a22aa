//! File tree services: browsing, folder creation, uploads.

pub mod service;
pub mod upload;

pub use service::{BrowseRequest, BrowseResult, FileService};
pub use upload::{UploadEntry, UploadService, UploadTree, UploadedFile};
