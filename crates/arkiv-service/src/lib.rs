//! # arkiv-service
//!
//! Domain services for Arkiv. Each service orchestrates repositories and
//! the blob store; every operation takes an explicit [`context::RequestContext`]
//! identifying the acting user.

pub mod context;
pub mod file;
pub mod share;
pub mod user;
