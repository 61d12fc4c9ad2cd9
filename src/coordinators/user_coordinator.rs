use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::{AppliedPassword, Registration, UserProvider};
use crate::types::internal::auth::UserProjection;
use crate::types::internal::context::RequestContext;

/// Orchestrates self-registration and operator account workflows
pub struct UserCoordinator {
    user_provider: Arc<UserProvider>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_provider: Arc::clone(&app_data.providers.user_provider),
        }
    }

    /// Register a new account; it stays unapproved and receives no token
    pub async fn register(&self, ctx: &RequestContext, registration: Registration) -> Result<UserProjection, InternalError> {
        let user = self.user_provider.register(registration).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %user.id,
            "User registered, awaiting approval"
        );

        Ok(user)
    }

    /// Create or promote a super-admin account
    ///
    /// # Authorization
    /// Super admin access (CLI contexts are trusted)
    pub async fn create_superuser(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: Option<String>,
        username: Option<String>,
    ) -> Result<(UserProjection, AppliedPassword), InternalError> {
        ctx.require_super_admin("create_superuser")?;

        let result = self.user_provider.create_superuser(email, password, username).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %result.0.id, "Superuser ready");

        Ok(result)
    }

    /// Set a new password for an account and revoke its token
    ///
    /// # Authorization
    /// Super admin access (CLI contexts are trusted)
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: Option<String>,
    ) -> Result<(UserProjection, AppliedPassword), InternalError> {
        ctx.require_super_admin("reset_password")?;

        let result = self.user_provider.reset_password(email, password).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %result.0.id, "Password reset by operator");

        Ok(result)
    }

    /// Approve a pending account by email
    ///
    /// # Authorization
    /// Super admin access (CLI contexts are trusted)
    pub async fn approve_by_email(&self, ctx: &RequestContext, email: &str) -> Result<UserProjection, InternalError> {
        ctx.require_super_admin("approve_user")?;

        let user = self.user_provider.approve_by_email(email).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %user.id, "User approved");

        Ok(user)
    }
}
