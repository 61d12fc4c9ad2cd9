use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::{AuthenticationProvider, TokenProvider, UserProvider};
use crate::stores::UserStore;
use crate::types::internal::auth::UserProjection;
use crate::types::internal::context::RequestContext;

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserProjection,
}

/// Orchestrates login, logout, profile and bearer-token resolution
pub struct LoginCoordinator {
    authentication_provider: Arc<AuthenticationProvider>,
    token_provider: Arc<TokenProvider>,
    user_provider: Arc<UserProvider>,
    user_store: Arc<UserStore>,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authentication_provider: Arc::clone(&app_data.providers.authentication_provider),
            token_provider: Arc::clone(&app_data.providers.token_provider),
            user_provider: Arc::clone(&app_data.providers.user_provider),
            user_store: Arc::clone(&app_data.stores.user_store),
        }
    }

    /// Orchestrate the login workflow
    ///
    /// 1. Verify identifier and password (status checked only after the password)
    /// 2. Fetch or create the user's token
    /// 3. Stamp `last_login_at`
    /// 4. Project the user with roles
    pub async fn login(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        let user = match self.authentication_provider.verify_credentials(identifier, password).await {
            Ok(user) => user,
            Err(err) => {
                tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, "Login rejected: {}", err);
                return Err(err);
            }
        };

        let token = self.token_provider.issue_token(&user.id).await?;
        self.user_store.record_login(&user.id).await?;
        let user = self.user_provider.project(user).await?;

        tracing::info!(request_id = %ctx.request_id, user_id = %user.id, "Login succeeded");

        Ok(LoginOutcome { token, user })
    }

    /// Resolve a bearer token into an authenticated context
    pub async fn authenticate(&self, ctx: RequestContext, token: &str) -> Result<RequestContext, InternalError> {
        let user = self.authentication_provider.verify_token(token).await?;
        let user = self.user_provider.project(user).await?;
        Ok(ctx.with_user(user))
    }

    /// The caller's own projection
    pub fn profile(&self, ctx: &RequestContext) -> Result<UserProjection, InternalError> {
        ctx.require_user().cloned()
    }

    /// Delete the caller's token; the next login creates a fresh one
    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let user = ctx.require_user()?;
        self.token_provider.revoke_token(&user.id).await?;

        tracing::info!(request_id = %ctx.request_id, user_id = %user.id, "Logged out");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AccessError, CredentialError};
    use crate::providers::Registration;
    use crate::test::utils::setup_test_app_data;

    async fn setup_with_user(approved: bool) -> (Arc<AppData>, LoginCoordinator) {
        let app_data = setup_test_app_data().await;
        app_data
            .providers
            .user_provider
            .register(Registration {
                email: "clinician@example.com".to_string(),
                password: "clinician-pass".to_string(),
                username: Some("Clinician".to_string()),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();
        if approved {
            app_data
                .providers
                .user_provider
                .approve_by_email("clinician@example.com")
                .await
                .unwrap();
        }

        let coordinator = LoginCoordinator::new(app_data.clone());
        (app_data, coordinator)
    }

    #[tokio::test]
    async fn test_login_returns_same_token_until_logout() {
        let (_app_data, coordinator) = setup_with_user(true).await;
        let ctx = RequestContext::for_api(None);

        let first = coordinator.login(&ctx, "clinician@example.com", "clinician-pass").await.unwrap();
        let second = coordinator.login(&ctx, "CLINICIAN", "clinician-pass").await.unwrap();
        assert_eq!(first.token, second.token);
        assert_eq!(first.user.email, "clinician@example.com");

        let authed = coordinator.authenticate(ctx.clone(), &first.token).await.unwrap();
        coordinator.logout(&authed).await.unwrap();

        let third = coordinator.login(&ctx, "clinician@example.com", "clinician-pass").await.unwrap();
        assert_ne!(first.token, third.token);
    }

    #[tokio::test]
    async fn test_login_records_last_login() {
        let (app_data, coordinator) = setup_with_user(true).await;

        let outcome = coordinator
            .login(&RequestContext::for_api(None), "clinician@example.com", "clinician-pass")
            .await
            .unwrap();

        let stored = app_data.stores.user_store.get_by_id(&outcome.user.id).await.unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_pending_user_gets_no_token() {
        let (app_data, coordinator) = setup_with_user(false).await;

        let result = coordinator
            .login(&RequestContext::for_api(None), "clinician@example.com", "clinician-pass")
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::PendingApproval))
        ));
        let user = app_data
            .stores
            .user_store
            .find_by_email("clinician@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(app_data.stores.token_store.find_by_user(&user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_requires_authentication() {
        let (_app_data, coordinator) = setup_with_user(true).await;

        assert!(matches!(
            coordinator.profile(&RequestContext::for_api(None)),
            Err(InternalError::Access(AccessError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_populates_context() {
        let (_app_data, coordinator) = setup_with_user(true).await;
        let ctx = RequestContext::for_api(None);
        let outcome = coordinator.login(&ctx, "clinician@example.com", "clinician-pass").await.unwrap();

        let authed = coordinator.authenticate(ctx, &outcome.token).await.unwrap();

        assert_eq!(authed.actor_id, outcome.user.id);
        assert_eq!(coordinator.profile(&authed).unwrap().username, "Clinician");
    }
}
