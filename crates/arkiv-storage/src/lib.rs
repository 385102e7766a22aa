//! # arkiv-storage
//!
//! Blob store implementation for Arkiv. Uploaded bytes land here; node
//! metadata references them only by the opaque paths this crate returns.

pub mod local;

pub use local::LocalBlobStore;
