use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::AccessError;
use crate::providers::UserProvider;
use crate::stores::{RoleStore, UserStatus, UserStore};
use crate::types::db::role;
use crate::types::internal::auth::{SUPERUSER_ROLE, UserProjection};
use crate::types::internal::context::RequestContext;

/// Admin coordinator that orchestrates user and role management workflows
///
/// Every operation requires super admin access on the caller (see
/// `RequestContext::require_super_admin`). Callers cannot deactivate or
/// delete themselves, nor drop their own `SUPERUSER` role.
pub struct AdminCoordinator {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    user_provider: Arc<UserProvider>,
}

impl AdminCoordinator {
    /// Create AdminCoordinator from AppData
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: Arc::clone(&app_data.stores.user_store),
            role_store: Arc::clone(&app_data.stores.role_store),
            user_provider: Arc::clone(&app_data.providers.user_provider),
        }
    }

    fn deny_self(caller: Option<&UserProjection>, target_user_id: &str, action: &str) -> Result<(), InternalError> {
        match caller {
            Some(caller) if caller.id == target_user_id => Err(AccessError::self_modification_denied(action).into()),
            _ => Ok(()),
        }
    }

    /// List users, optionally filtered by status
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        status: Option<UserStatus>,
    ) -> Result<Vec<UserProjection>, InternalError> {
        ctx.require_super_admin("list_users")?;

        let users = self.user_store.list_users(status).await?;
        self.user_provider.project_many(users).await
    }

    pub async fn get_user(&self, ctx: &RequestContext, user_id: &str) -> Result<UserProjection, InternalError> {
        ctx.require_super_admin("get_user")?;
        self.user_provider.load_projection(user_id).await
    }

    pub async fn list_roles(&self, ctx: &RequestContext) -> Result<Vec<role::Model>, InternalError> {
        ctx.require_super_admin("list_roles")?;
        self.role_store.list_roles().await
    }

    /// Assign a catalogue role to a user
    ///
    /// Idempotent: assigning a role the user already holds succeeds.
    ///
    /// # Returns
    /// * `Ok((UserProjection, bool))` - Updated user and whether anything changed
    pub async fn assign_role(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        role_name: &str,
    ) -> Result<(UserProjection, bool), InternalError> {
        ctx.require_super_admin("assign_role")?;

        self.user_store.get_by_id(user_id).await?;
        let changed = self.role_store.assign_role(user_id, role_name).await?;

        tracing::info!(actor = %ctx.actor_id, user_id = %user_id, role = %role_name, changed, "Assign role");

        Ok((self.user_provider.load_projection(user_id).await?, changed))
    }

    /// Remove a role from a user
    ///
    /// Idempotent. A caller may not remove `SUPERUSER` from themselves.
    pub async fn revoke_role(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        role_name: &str,
    ) -> Result<(UserProjection, bool), InternalError> {
        let caller = ctx.require_super_admin("revoke_role")?;

        let role = self.role_store.get_role(role_name).await?;
        if role.name == SUPERUSER_ROLE {
            Self::deny_self(caller, user_id, "remove the SUPERUSER role from")?;
        }

        self.user_store.get_by_id(user_id).await?;
        let changed = self.role_store.revoke_role(user_id, &role.name).await?;

        tracing::info!(actor = %ctx.actor_id, user_id = %user_id, role = %role.name, changed, "Revoke role");

        Ok((self.user_provider.load_projection(user_id).await?, changed))
    }

    pub async fn approve_user(&self, ctx: &RequestContext, user_id: &str) -> Result<UserProjection, InternalError> {
        ctx.require_super_admin("approve_user")?;

        let user = self.user_store.set_approved(user_id, true).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %user_id, "User approved");

        self.user_provider.project(user).await
    }

    /// Deactivate a user and revoke their token
    pub async fn deactivate_user(&self, ctx: &RequestContext, user_id: &str) -> Result<UserProjection, InternalError> {
        let caller = ctx.require_super_admin("deactivate_user")?;
        Self::deny_self(caller, user_id, "deactivate")?;

        let user = self.user_store.deactivate_user(user_id).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %user_id, "User deactivated");

        self.user_provider.project(user).await
    }

    pub async fn activate_user(&self, ctx: &RequestContext, user_id: &str) -> Result<UserProjection, InternalError> {
        ctx.require_super_admin("activate_user")?;

        let user = self.user_store.set_active(user_id, true).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %user_id, "User reactivated");

        self.user_provider.project(user).await
    }

    /// Delete a user with their role assignments and token
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &str) -> Result<(), InternalError> {
        let caller = ctx.require_super_admin("delete_user")?;
        Self::deny_self(caller, user_id, "delete")?;

        self.user_store.delete_user(user_id).await?;
        tracing::info!(actor = %ctx.actor_id, user_id = %user_id, "User deleted by admin");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{CredentialError, RoleError};
    use crate::providers::Registration;
    use crate::test::utils::setup_test_app_data;

    struct Fixture {
        app_data: Arc<AppData>,
        coordinator: AdminCoordinator,
        admin_ctx: RequestContext,
        member_id: String,
    }

    async fn fixture() -> Fixture {
        let app_data = setup_test_app_data().await;
        let users = &app_data.providers.user_provider;

        let (admin, _) = users
            .create_superuser("admin@example.com", Some("admin-password".to_string()), None)
            .await
            .unwrap();
        let member = users
            .register(Registration {
                email: "member@example.com".to_string(),
                password: "member-password".to_string(),
                username: None,
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();

        Fixture {
            coordinator: AdminCoordinator::new(app_data.clone()),
            app_data,
            admin_ctx: RequestContext::for_api(None).with_user(admin),
            member_id: member.id,
        }
    }

    fn access_error<T: std::fmt::Debug>(result: Result<T, InternalError>) -> AccessError {
        match result {
            Err(InternalError::Access(err)) => err,
            other => panic!("expected access error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_admin_is_rejected_everywhere() {
        let f = fixture().await;
        let member = f.app_data.providers.user_provider.load_projection(&f.member_id).await.unwrap();
        let ctx = RequestContext::for_api(None).with_user(member);
        let id = f.member_id.as_str();

        assert!(matches!(access_error(f.coordinator.list_users(&ctx, None).await), AccessError::SuperAdminRequired { .. }));
        assert!(matches!(access_error(f.coordinator.get_user(&ctx, id).await), AccessError::SuperAdminRequired { .. }));
        assert!(matches!(access_error(f.coordinator.list_roles(&ctx).await), AccessError::SuperAdminRequired { .. }));
        assert!(matches!(access_error(f.coordinator.assign_role(&ctx, id, "ADMIN").await), AccessError::SuperAdminRequired { .. }));
        assert!(matches!(access_error(f.coordinator.approve_user(&ctx, id).await), AccessError::SuperAdminRequired { .. }));
        assert!(matches!(access_error(f.coordinator.delete_user(&ctx, id).await), AccessError::SuperAdminRequired { .. }));
    }

    #[tokio::test]
    async fn test_list_users_with_status_filter() {
        let f = fixture().await;

        let all = f.coordinator.list_users(&f.admin_ctx, None).await.unwrap();
        let pending = f.coordinator.list_users(&f.admin_ctx, Some(UserStatus::Pending)).await.unwrap();
        let active = f.coordinator.list_users(&f.admin_ctx, Some(UserStatus::Active)).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(pending.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(), vec![f.member_id.as_str()]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].roles, vec![SUPERUSER_ROLE.to_string()]);
    }

    #[tokio::test]
    async fn test_assign_and_revoke_role() {
        let f = fixture().await;

        let (user, changed) = f.coordinator.assign_role(&f.admin_ctx, &f.member_id, "radiologist").await.unwrap();
        assert!(changed);
        assert_eq!(user.roles, vec!["RADIOLOGIST".to_string()]);

        let (_, changed) = f.coordinator.assign_role(&f.admin_ctx, &f.member_id, "RADIOLOGIST").await.unwrap();
        assert!(!changed);

        let (user, changed) = f.coordinator.revoke_role(&f.admin_ctx, &f.member_id, "RADIOLOGIST").await.unwrap();
        assert!(changed);
        assert!(user.roles.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_and_missing_user() {
        let f = fixture().await;

        assert!(matches!(
            f.coordinator.assign_role(&f.admin_ctx, &f.member_id, "JANITOR").await,
            Err(InternalError::Role(RoleError::UnknownRole(_)))
        ));
        assert!(matches!(
            f.coordinator.assign_role(&f.admin_ctx, "no-such-user", "VIEWER").await,
            Err(InternalError::Credential(CredentialError::UserNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_self_protection() {
        let f = fixture().await;
        let admin_id = f.admin_ctx.actor_id.clone();

        assert!(matches!(
            access_error(f.coordinator.deactivate_user(&f.admin_ctx, &admin_id).await),
            AccessError::SelfModificationDenied { .. }
        ));
        assert!(matches!(
            access_error(f.coordinator.delete_user(&f.admin_ctx, &admin_id).await),
            AccessError::SelfModificationDenied { .. }
        ));
        assert!(matches!(
            access_error(f.coordinator.revoke_role(&f.admin_ctx, &admin_id, "superuser").await),
            AccessError::SelfModificationDenied { .. }
        ));
        // Other roles may be dropped from one's own account
        assert!(f.coordinator.revoke_role(&f.admin_ctx, &admin_id, "VIEWER").await.is_ok());
    }

    #[tokio::test]
    async fn test_deactivate_revokes_token_and_activate_restores() {
        let f = fixture().await;
        f.coordinator.approve_user(&f.admin_ctx, &f.member_id).await.unwrap();
        f.app_data.providers.token_provider.issue_token(&f.member_id).await.unwrap();

        let user = f.coordinator.deactivate_user(&f.admin_ctx, &f.member_id).await.unwrap();
        assert!(!user.is_active);
        assert!(f.app_data.stores.token_store.find_by_user(&f.member_id).await.unwrap().is_none());

        let user = f.coordinator.activate_user(&f.admin_ctx, &f.member_id).await.unwrap();
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let f = fixture().await;
        f.coordinator.assign_role(&f.admin_ctx, &f.member_id, "DOCTOR").await.unwrap();
        f.app_data.providers.token_provider.issue_token(&f.member_id).await.unwrap();

        f.coordinator.delete_user(&f.admin_ctx, &f.member_id).await.unwrap();

        let stores = &f.app_data.stores;
        assert!(stores.user_store.find_by_id(&f.member_id).await.unwrap().is_none());
        assert!(stores.token_store.find_by_user(&f.member_id).await.unwrap().is_none());
        assert!(stores.role_store.roles_for_user(&f.member_id).await.unwrap().is_empty());
    }
}
