//! Sharing services: permission grants and share listings.

pub mod service;

pub use service::{GrantSharesRequest, ShareService};
