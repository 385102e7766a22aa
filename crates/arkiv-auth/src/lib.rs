//! # arkiv-auth
//!
//! Argon2id password hashing, password policy checks, and JWT access
//! token encode/decode for Arkiv.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtCodec};
pub use password::{PasswordHasher, PasswordPolicy};
