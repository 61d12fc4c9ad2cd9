use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    OpenApi, Tags,
    param::{Path, Query},
    payload::Json,
};

use crate::api::helpers;
use crate::coordinators::{AdminCoordinator, LoginCoordinator};
use crate::errors::AdminError;
use crate::stores::UserStatus;
use crate::types::dto::admin::{
    AssignRoleRequest, RoleListResponse, UserActionResponse, UserListResponse, UserStatusFilter,
};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;
use crate::types::internal::auth::UserProjection;
use crate::types::internal::context::RequestContext;

/// User and role administration endpoints
///
/// Every endpoint requires a caller with super admin access.
pub struct AdminApi {
    login_coordinator: Arc<LoginCoordinator>,
    admin_coordinator: Arc<AdminCoordinator>,
}

impl AdminApi {
    pub fn new(login_coordinator: Arc<LoginCoordinator>, admin_coordinator: Arc<AdminCoordinator>) -> Self {
        Self {
            login_coordinator,
            admin_coordinator,
        }
    }

    async fn context(&self, req: &Request) -> Result<RequestContext, AdminError> {
        Ok(helpers::authenticated_context(req, &self.login_coordinator).await?)
    }
}

impl From<UserStatusFilter> for UserStatus {
    fn from(filter: UserStatusFilter) -> Self {
        match filter {
            UserStatusFilter::Pending => UserStatus::Pending,
            UserStatusFilter::Active => UserStatus::Active,
            UserStatusFilter::Inactive => UserStatus::Inactive,
        }
    }
}

fn action_response(message: impl Into<String>, user: UserProjection) -> Json<UserActionResponse> {
    Json(UserActionResponse {
        success: true,
        message: message.into(),
        user: user.into(),
    })
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// User and role administration
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List users, optionally filtered by status
    #[oai(path = "/users", method = "get", tag = "AdminTags::Admin")]
    async fn list_users(
        &self,
        req: &Request,
        status: Query<Option<UserStatusFilter>>,
    ) -> Result<Json<UserListResponse>, AdminError> {
        let ctx = self.context(req).await?;

        let users = self
            .admin_coordinator
            .list_users(&ctx, status.0.map(UserStatus::from))
            .await?;

        Ok(Json(UserListResponse {
            count: users.len() as u64,
            users: users.into_iter().map(UserResponse::from).collect(),
        }))
    }

    /// Get a single user
    #[oai(path = "/users/:user_id", method = "get", tag = "AdminTags::Admin")]
    async fn get_user(&self, req: &Request, user_id: Path<String>) -> Result<Json<UserResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let user = self.admin_coordinator.get_user(&ctx, &user_id.0).await?;

        Ok(Json(user.into()))
    }

    /// Delete a user together with their role assignments and token
    #[oai(path = "/users/:user_id", method = "delete", tag = "AdminTags::Admin")]
    async fn delete_user(&self, req: &Request, user_id: Path<String>) -> Result<Json<MessageResponse>, AdminError> {
        let ctx = self.context(req).await?;
        self.admin_coordinator.delete_user(&ctx, &user_id.0).await?;

        Ok(Json(MessageResponse {
            message: format!("User {} deleted", user_id.0),
        }))
    }

    /// Approve a pending user
    #[oai(path = "/users/:user_id/approve", method = "post", tag = "AdminTags::Admin")]
    async fn approve_user(&self, req: &Request, user_id: Path<String>) -> Result<Json<UserActionResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let user = self.admin_coordinator.approve_user(&ctx, &user_id.0).await?;

        Ok(action_response(format!("User {} approved", user.email), user))
    }

    /// Deactivate a user and revoke their token
    #[oai(path = "/users/:user_id/deactivate", method = "post", tag = "AdminTags::Admin")]
    async fn deactivate_user(&self, req: &Request, user_id: Path<String>) -> Result<Json<UserActionResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let user = self.admin_coordinator.deactivate_user(&ctx, &user_id.0).await?;

        Ok(action_response(format!("User {} deactivated", user.email), user))
    }

    /// Reactivate a deactivated user
    #[oai(path = "/users/:user_id/activate", method = "post", tag = "AdminTags::Admin")]
    async fn activate_user(&self, req: &Request, user_id: Path<String>) -> Result<Json<UserActionResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let user = self.admin_coordinator.activate_user(&ctx, &user_id.0).await?;

        Ok(action_response(format!("User {} activated", user.email), user))
    }

    /// Assign a role to a user
    #[oai(path = "/users/:user_id/roles", method = "post", tag = "AdminTags::Admin")]
    async fn assign_role(
        &self,
        req: &Request,
        user_id: Path<String>,
        body: Json<AssignRoleRequest>,
    ) -> Result<Json<UserActionResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let (user, changed) = self
            .admin_coordinator
            .assign_role(&ctx, &user_id.0, &body.role)
            .await?;

        let role = body.role.trim().to_uppercase();
        let message = if changed {
            format!("Role {} assigned to {}", role, user.email)
        } else {
            format!("User {} already has role {}", user.email, role)
        };

        Ok(action_response(message, user))
    }

    /// Remove a role from a user
    #[oai(path = "/users/:user_id/roles/:role", method = "delete", tag = "AdminTags::Admin")]
    async fn revoke_role(
        &self,
        req: &Request,
        user_id: Path<String>,
        role: Path<String>,
    ) -> Result<Json<UserActionResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let (user, changed) = self
            .admin_coordinator
            .revoke_role(&ctx, &user_id.0, &role.0)
            .await?;

        let role = role.0.trim().to_uppercase();
        let message = if changed {
            format!("Role {} removed from {}", role, user.email)
        } else {
            format!("User {} does not have role {}", user.email, role)
        };

        Ok(action_response(message, user))
    }

    /// List the role catalogue
    #[oai(path = "/roles", method = "get", tag = "AdminTags::Admin")]
    async fn list_roles(&self, req: &Request) -> Result<Json<RoleListResponse>, AdminError> {
        let ctx = self.context(req).await?;
        let roles = self.admin_coordinator.list_roles(&ctx).await?;

        Ok(Json(RoleListResponse {
            roles: roles.into_iter().map(Into::into).collect(),
        }))
    }
}
