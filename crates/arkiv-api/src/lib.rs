//! # arkiv-api
//!
//! HTTP boundary for Arkiv: the axum router, application state,
//! authentication extractor, request/response DTOs, and handlers.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod multipart;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
