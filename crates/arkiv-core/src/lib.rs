//! # arkiv-core
//!
//! Core crate for Arkiv. Contains configuration schemas, pagination and
//! sorting types, the blob store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Arkiv crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
