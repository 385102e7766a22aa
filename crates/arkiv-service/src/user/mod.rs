//! Account services: registration, login, profile.

pub mod service;

pub use service::{AuthenticatedUser, LoginRequest, RegisterRequest, UserService};
