use crate::errors::api::auth::validation_message;
use crate::errors::internal::{AccessError, CredentialError, InternalError, RoleError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Admin operation error types
#[derive(ApiResponse, Debug)]
#[oai(bad_request_handler = "admin_bad_request")]
pub enum AdminError {
    /// Missing, malformed or revoked token
    #[oai(status = 401)]
    NotAuthenticated(Json<ErrorResponse>),

    /// Caller's own account has been disabled
    #[oai(status = 403)]
    AccountDisabled(Json<ErrorResponse>),

    /// Caller's own account is pending approval
    #[oai(status = 403)]
    PendingApproval(Json<ErrorResponse>),

    /// Caller lacks super admin access or attempted a forbidden self-modification
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Target user not found
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Request payload failed validation
    #[oai(status = 400)]
    ValidationError(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    ServerError(Json<ErrorResponse>),
}

impl AdminError {
    /// Create a NotAuthenticated error
    pub fn not_authenticated() -> Self {
        AdminError::NotAuthenticated(ErrorResponse::json(
            "not_authenticated",
            "Authentication credentials were not provided or are invalid",
            401,
        ))
    }

    /// Create an AccountDisabled error
    pub fn account_disabled() -> Self {
        AdminError::AccountDisabled(ErrorResponse::json(
            "account_disabled",
            "This account has been disabled",
            403,
        ))
    }

    /// Create a PendingApproval error
    pub fn pending_approval() -> Self {
        AdminError::PendingApproval(ErrorResponse::json(
            "pending_approval",
            "This account is pending administrator approval",
            403,
        ))
    }

    /// Create a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        AdminError::Forbidden(ErrorResponse::json("forbidden", message, 403))
    }

    /// Create a NotFound error for a user id
    pub fn user_not_found(user_id: &str) -> Self {
        AdminError::NotFound(ErrorResponse::json(
            "not_found",
            format!("User not found: {}", user_id),
            404,
        ))
    }

    /// Create a ValidationError
    pub fn validation_error(message: impl Into<String>) -> Self {
        AdminError::ValidationError(ErrorResponse::json("validation_error", message, 400))
    }

    /// Create a generic server error without exposing internal details
    pub fn server_error() -> Self {
        AdminError::ServerError(ErrorResponse::json(
            "server_error",
            "An internal error occurred",
            500,
        ))
    }

    /// Convert InternalError to AdminError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Access(AccessError::NotAuthenticated)
            | InternalError::Credential(CredentialError::InvalidToken { .. }) => {
                tracing::debug!("Unauthenticated admin request: {}", err);
                Self::not_authenticated()
            }
            InternalError::Credential(CredentialError::AccountDisabled) => Self::account_disabled(),
            InternalError::Credential(CredentialError::PendingApproval) => Self::pending_approval(),
            InternalError::Access(AccessError::SuperAdminRequired { action }) => {
                tracing::warn!("Super admin access denied for {}", action);
                Self::forbidden("Super admin access required")
            }
            InternalError::Access(AccessError::SelfModificationDenied { .. }) => {
                tracing::warn!("Self-modification denied: {}", err);
                Self::forbidden(err.to_string())
            }
            InternalError::Credential(CredentialError::UserNotFound(user_id)) => {
                tracing::debug!("Admin target user not found: {}", user_id);
                Self::user_not_found(user_id)
            }
            InternalError::Role(RoleError::UnknownRole(role)) => {
                tracing::debug!("Unknown role requested: {}", role);
                Self::validation_error(format!("Unknown role: {}", role))
            }
            InternalError::Credential(
                CredentialError::DuplicateEmail(_)
                | CredentialError::DuplicateUsername(_)
                | CredentialError::InvalidUsername(_)
                | CredentialError::InvalidEmail(_)
                | CredentialError::PasswordValidationFailed(_),
            ) => Self::validation_error(validation_message(&err)),
            _ => {
                tracing::error!("Unexpected error in admin operation: {}", err);
                Self::server_error()
            }
        }
    }

    /// Get the error body from the error variant
    pub fn body(&self) -> &ErrorResponse {
        match self {
            AdminError::NotAuthenticated(json)
            | AdminError::AccountDisabled(json)
            | AdminError::PendingApproval(json)
            | AdminError::Forbidden(json)
            | AdminError::NotFound(json)
            | AdminError::ValidationError(json)
            | AdminError::ServerError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }
}

/// Request bodies or parameters the framework could not parse
pub(crate) fn admin_bad_request(err: poem::Error) -> AdminError {
    tracing::debug!("Rejected malformed admin request: {}", err);
    AdminError::validation_error(err.to_string())
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
