//! Tree node entity: folders and files in a per-user hierarchy.

pub mod model;

pub use model::{Node, NodeKind, NodeVariant, NewNode, ROOT_PATH, child_path};
