//! Trait seams implemented by other Arkiv crates.

pub mod blob;

pub use blob::{BlobStore, ByteStream};
