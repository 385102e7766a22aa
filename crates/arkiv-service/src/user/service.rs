//! Registration, login, and profile access.

use std::sync::Arc;

use tracing::info;

use arkiv_auth::jwt::{IssuedToken, JwtCodec};
use arkiv_auth::password::{PasswordHasher, PasswordPolicy};
use arkiv_core::error::{AppError, ErrorKind};
use arkiv_database::repositories::node::NodeRepository;
use arkiv_database::repositories::user::UserRepository;
use arkiv_entity::user::{NewUser, User};

use crate::context::RequestContext;

/// Orchestrates account creation and authentication.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    users: Arc<UserRepository>,
    /// Node repository (root provisioning).
    nodes: Arc<NodeRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    policy: PasswordPolicy,
    /// Access token codec.
    jwt: Arc<JwtCodec>,
}

/// Request to register a new account.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub fullname: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// A user together with a freshly issued access token.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthenticatedUser {
    /// The account.
    pub user: User,
    /// The issued token.
    #[serde(flatten)]
    pub token: IssuedToken,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<UserRepository>,
        nodes: Arc<NodeRepository>,
        hasher: Arc<PasswordHasher>,
        policy: PasswordPolicy,
        jwt: Arc<JwtCodec>,
    ) -> Self {
        Self {
            users,
            nodes,
            hasher,
            policy,
            jwt,
        }
    }

    /// Registers a new account and provisions its root folder, atomically.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthenticatedUser, AppError> {
        let fullname = req.fullname.trim();
        if fullname.is_empty() {
            return Err(AppError::validation_field("fullname", "Name cannot be empty"));
        }
        let email = req.email.trim();
        if !email.contains('@') {
            return Err(AppError::validation_field("email", "Invalid email address"));
        }
        self.policy.validate(&req.password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::validation_field(
                "email",
                format!("An account with email \"{email}\" already exists"),
            ));
        }

        let password_hash = self.hasher.hash_password(&req.password)?;

        let mut tx = self.users.begin().await?;
        let user = self
            .users
            .create(
                &mut tx,
                &NewUser {
                    fullname: fullname.to_string(),
                    email: email.to_string(),
                    password_hash,
                },
            )
            .await?;
        self.nodes.create_root(&mut tx, user.id).await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        info!(user_id = %user.id, "Account registered");

        let token = self.jwt.issue(user.id, &user.email, &user.fullname)?;
        Ok(AuthenticatedUser { user, token })
    }

    /// Verifies credentials and issues an access token.
    ///
    /// Unknown email and wrong password fail identically, so the response
    /// does not reveal which one it was.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthenticatedUser, AppError> {
        let invalid = || AppError::authentication("Invalid email or password");

        let user = self
            .users
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify_password(&req.password, &user.password_hash)? {
            return Err(invalid());
        }

        info!(user_id = %user.id, "User logged in");

        let token = self.jwt.issue(user.id, &user.email, &user.fullname)?;
        Ok(AuthenticatedUser { user, token })
    }

    /// The acting user's profile.
    pub async fn me(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
