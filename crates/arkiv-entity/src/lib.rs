//! # arkiv-entity
//!
//! Domain entity models for Arkiv. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally implement `sqlx::FromRow`.

pub mod node;
pub mod permission;
pub mod share;
pub mod user;
