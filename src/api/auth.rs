use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers;
use crate::coordinators::{LoginCoordinator, UserCoordinator};
use crate::errors::AuthError;
use crate::providers::Registration;
use crate::types::dto::auth::{
    LoginRequest, LoginResponse, RegisterApiResponse, RegisterRequest, RegisterResponse,
};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;

/// Authentication API endpoints
pub struct AuthApi {
    login_coordinator: Arc<LoginCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
}

impl AuthApi {
    pub fn new(login_coordinator: Arc<LoginCoordinator>, user_coordinator: Arc<UserCoordinator>) -> Self {
        Self {
            login_coordinator,
            user_coordinator,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Authenticate with email (or username) and password
    ///
    /// Returns the caller's API token and profile. Logging in again returns
    /// the same token until it is revoked.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = helpers::request_context(req);

        let Some(identifier) = body.identifier() else {
            return Err(AuthError::validation_error("Email is required"));
        };

        let outcome = self
            .login_coordinator
            .login(&ctx, identifier, &body.password)
            .await?;

        Ok(Json(LoginResponse {
            token: outcome.token,
            user: outcome.user.into(),
        }))
    }

    /// Register a new account
    ///
    /// The account must be approved by an administrator before it can log in.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<RegisterApiResponse, AuthError> {
        let ctx = helpers::request_context(req);
        let body = body.0;

        let user = self
            .user_coordinator
            .register(
                &ctx,
                Registration {
                    email: body.email,
                    password: body.password,
                    username: body.username,
                    first_name: body.first_name,
                    last_name: body.last_name,
                },
            )
            .await?;

        Ok(RegisterApiResponse::Created(Json(RegisterResponse {
            message: "Registration successful. Your account is pending approval.".to_string(),
            user: user.into(),
        })))
    }

    /// Get the authenticated user's profile
    #[oai(path = "/profile", method = "get", tag = "AuthTags::Authentication")]
    async fn profile(&self, req: &Request) -> Result<Json<UserResponse>, AuthError> {
        let ctx = helpers::authenticated_context(req, &self.login_coordinator).await?;
        let user = self.login_coordinator.profile(&ctx)?;

        Ok(Json(user.into()))
    }

    /// Revoke the authenticated user's token
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = helpers::authenticated_context(req, &self.login_coordinator).await?;
        self.login_coordinator.logout(&ctx).await?;

        Ok(Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }))
    }
}
