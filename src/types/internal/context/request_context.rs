use std::net::IpAddr;

use crate::errors::InternalError;
use crate::errors::internal::AccessError;
use crate::types::internal::auth::UserProjection;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for logging and authorization across API, coordinator and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Authenticated caller, resolved from the bearer token
    pub user: Option<UserProjection>,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create an unauthenticated RequestContext for an API request
    pub fn for_api(ip_address: Option<IpAddr>) -> Self {
        Self {
            ip_address,
            request_id: RequestId::new(),
            user: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_string(),
        }
    }

    /// Create a RequestContext for CLI operations
    ///
    /// CLI commands run with server access and bypass the authorization predicate.
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            user: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Attach the authenticated caller and use its id as actor
    pub fn with_user(mut self, user: UserProjection) -> Self {
        self.actor_id = user.id.clone();
        self.user = Some(user);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Authenticated caller, or `AccessError::NotAuthenticated`
    pub fn require_user(&self) -> Result<&UserProjection, InternalError> {
        self.user
            .as_ref()
            .ok_or_else(|| InternalError::from(AccessError::NotAuthenticated))
    }

    /// Authenticated caller holding super admin access
    ///
    /// CLI contexts are trusted and return `Ok(None)`.
    pub fn require_super_admin(&self, action: &str) -> Result<Option<&UserProjection>, InternalError> {
        if self.source == RequestSource::CLI {
            return Ok(None);
        }

        let user = self.require_user()?;
        if !user.has_super_admin_access() {
            tracing::warn!(
                request_id = %self.request_id,
                actor = %self.actor_id,
                "Super admin access denied for {}",
                action
            );
            return Err(AccessError::super_admin_required(action).into());
        }

        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool, roles: &[&str]) -> UserProjection {
        UserProjection {
            id: "caller-id".to_string(),
            email: "caller@example.com".to_string(),
            username: "caller".to_string(),
            first_name: None,
            last_name: None,
            is_superuser,
            is_staff: false,
            is_active: true,
            is_approved: true,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_api_context_starts_unauthenticated() {
        let ctx = RequestContext::for_api(Some("10.0.0.1".parse().unwrap()));
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.source, RequestSource::API);
        assert!(matches!(
            ctx.require_user(),
            Err(InternalError::Access(AccessError::NotAuthenticated))
        ));
    }

    #[test]
    fn test_with_user_sets_actor_id() {
        let ctx = RequestContext::for_api(None).with_user(user(false, &[]));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.actor_id, "caller-id");
    }

    #[test]
    fn test_require_super_admin_rejects_regular_user() {
        let ctx = RequestContext::for_api(None).with_user(user(false, &["DOCTOR"]));
        assert!(matches!(
            ctx.require_super_admin("list_users"),
            Err(InternalError::Access(AccessError::SuperAdminRequired { .. }))
        ));
    }

    #[test]
    fn test_require_super_admin_accepts_role_holder() {
        let ctx = RequestContext::for_api(None).with_user(user(false, &["SUPERUSER"]));
        let caller = ctx.require_super_admin("list_users").unwrap();
        assert_eq!(caller.map(|u| u.id.as_str()), Some("caller-id"));
    }

    #[test]
    fn test_cli_context_is_trusted() {
        let ctx = RequestContext::for_cli("approve-user");
        assert_eq!(ctx.actor_id, "cli:approve-user");
        assert!(ctx.require_super_admin("approve_user").unwrap().is_none());
    }
}
