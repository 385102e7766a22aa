//! Share grants and share listings.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use arkiv_core::error::{AppError, ErrorKind};
use arkiv_database::repositories::node::NodeRepository;
use arkiv_database::repositories::permission::PermissionRepository;
use arkiv_database::repositories::share::ShareRepository;
use arkiv_database::repositories::user::UserRepository;
use arkiv_entity::node::Node;
use arkiv_entity::share::{FileShares, NewShare, OwnerSummary, Share};

use crate::context::RequestContext;

/// Orchestrates permission grants and read access to share lists.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share repository.
    shares: Arc<ShareRepository>,
    /// Node repository.
    nodes: Arc<NodeRepository>,
    /// User repository.
    users: Arc<UserRepository>,
    /// Permission repository.
    permissions: Arc<PermissionRepository>,
}

/// Request to grant (or re-grant) a permission on a file to a set of
/// users identified by email.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GrantSharesRequest {
    /// The permission to grant.
    pub permission_id: Uuid,
    /// Grantee emails.
    pub emails: Vec<String>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<ShareRepository>,
        nodes: Arc<NodeRepository>,
        users: Arc<UserRepository>,
        permissions: Arc<PermissionRepository>,
    ) -> Self {
        Self {
            shares,
            nodes,
            users,
            permissions,
        }
    }

    /// Lists a file's shares: the owner identity and every grantee with
    /// their permission name.
    ///
    /// Readable only by the file's owner or an existing grantee.
    pub async fn list_shares(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<FileShares, AppError> {
        let file = self.resolve_accessible_file(ctx, file_id).await?;

        let owner = self
            .users
            .find_by_id(file.owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("File owner not found"))?;

        let shares = self.shares.find_for_file(file.id).await?;

        Ok(FileShares {
            file_id: file.id,
            file_name: file.name,
            owner: OwnerSummary {
                id: owner.id,
                name: owner.fullname,
                email: owner.email,
            },
            shares,
        })
    }

    /// Grants (or re-grants) a permission on a file to every listed email.
    ///
    /// Only the file's owner may share it. Every email must resolve to an
    /// existing user before anything is written; the grants then land in
    /// one transaction, so an unknown email means no shares are applied
    /// at all.
    pub async fn grant_shares(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        req: GrantSharesRequest,
    ) -> Result<Vec<Share>, AppError> {
        let file = self.find_shareable_file(file_id).await?;

        if file.owner_id != ctx.user_id {
            return Err(AppError::authorization(
                "You do not have permission to share this file.",
            ));
        }

        if req.emails.is_empty() {
            return Err(AppError::validation_field("emails", "No emails supplied"));
        }

        let permission = self
            .permissions
            .find_by_id(req.permission_id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))?;

        let mut grantees = Vec::with_capacity(req.emails.len());
        for email in &req.emails {
            let user = self
                .users
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User with email {email} not found.")))?;

            if user.id == ctx.user_id {
                return Err(AppError::validation_field(
                    "emails",
                    "You cannot share a file with yourself.",
                ));
            }
            grantees.push(user);
        }

        let mut tx = self.shares.begin().await?;
        let mut granted = Vec::with_capacity(grantees.len());
        for user in &grantees {
            let share = self
                .shares
                .upsert(
                    &mut tx,
                    &NewShare {
                        file_id: file.id,
                        user_id: user.id,
                        permission_id: permission.id,
                        created_by: ctx.user_id,
                    },
                )
                .await?;
            granted.push(share);
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit shares", e)
        })?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            permission = %permission.name,
            grantees = granted.len(),
            "File shared"
        );

        Ok(granted)
    }

    /// Fetches a live file the acting user may read: the owner or any
    /// existing grantee.
    pub async fn resolve_accessible_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<Node, AppError> {
        let file = self.find_shareable_file(file_id).await?;

        if file.owner_id != ctx.user_id && !self.shares.exists_for(file.id, ctx.user_id).await? {
            return Err(AppError::authorization(
                "You do not have access to this file.",
            ));
        }
        Ok(file)
    }

    /// Fetches a live file node by id; folders cannot be shared.
    async fn find_shareable_file(&self, file_id: Uuid) -> Result<Node, AppError> {
        let node = self
            .nodes
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        if node.is_folder() {
            return Err(AppError::validation("Only files can be shared"));
        }
        Ok(node)
    }
}
