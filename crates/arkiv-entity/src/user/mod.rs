//! User entity: owns a tree and appears as a share grantee.

pub mod model;

pub use model::{NewUser, User};
