use crate::errors::internal::{AccessError, CredentialError, InternalError};
use crate::types::dto::common::ErrorResponse;
use poem_openapi::{ApiResponse, payload::Json};
use std::fmt;

/// Authentication error types
#[derive(ApiResponse, Debug)]
#[oai(bad_request_handler = "auth_bad_request")]
pub enum AuthError {
    /// Invalid email/username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Account exists but has been disabled
    #[oai(status = 403)]
    AccountDisabled(Json<ErrorResponse>),

    /// Account exists but has not been approved yet
    #[oai(status = 403)]
    PendingApproval(Json<ErrorResponse>),

    /// Missing, malformed or revoked token
    #[oai(status = 401)]
    NotAuthenticated(Json<ErrorResponse>),

    /// Request payload failed validation
    #[oai(status = 400)]
    ValidationError(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    ServerError(Json<ErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(ErrorResponse::json(
            "invalid_credentials",
            "Invalid credentials",
            401,
        ))
    }

    /// Create an AccountDisabled error
    pub fn account_disabled() -> Self {
        AuthError::AccountDisabled(ErrorResponse::json(
            "account_disabled",
            "This account has been disabled",
            403,
        ))
    }

    /// Create a PendingApproval error
    pub fn pending_approval() -> Self {
        AuthError::PendingApproval(ErrorResponse::json(
            "pending_approval",
            "This account is pending administrator approval",
            403,
        ))
    }

    /// Create a NotAuthenticated error
    pub fn not_authenticated() -> Self {
        AuthError::NotAuthenticated(ErrorResponse::json(
            "not_authenticated",
            "Authentication credentials were not provided or are invalid",
            401,
        ))
    }

    /// Create a ValidationError
    pub fn validation_error(message: impl Into<String>) -> Self {
        AuthError::ValidationError(ErrorResponse::json("validation_error", message, 400))
    }

    /// Create a generic server error without exposing internal details
    pub fn server_error() -> Self {
        AuthError::ServerError(ErrorResponse::json(
            "server_error",
            "An internal error occurred",
            500,
        ))
    }

    /// Convert InternalError to AuthError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::AccountDisabled) => {
                tracing::debug!("Login attempt on disabled account");
                Self::account_disabled()
            }
            InternalError::Credential(CredentialError::PendingApproval) => {
                tracing::debug!("Login attempt on account pending approval");
                Self::pending_approval()
            }
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid token: {}", reason);
                Self::not_authenticated()
            }
            InternalError::Access(AccessError::NotAuthenticated) => Self::not_authenticated(),
            InternalError::Credential(
                CredentialError::DuplicateEmail(_)
                | CredentialError::DuplicateUsername(_)
                | CredentialError::InvalidUsername(_)
                | CredentialError::InvalidEmail(_)
                | CredentialError::PasswordValidationFailed(_),
            ) => {
                tracing::debug!("Registration rejected: {}", err);
                Self::validation_error(validation_message(&err))
            }
            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::server_error()
            }
        }
    }

    /// Get the error body from the error variant
    pub fn body(&self) -> &ErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::AccountDisabled(json)
            | AuthError::PendingApproval(json)
            | AuthError::NotAuthenticated(json)
            | AuthError::ValidationError(json)
            | AuthError::ServerError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.body().message.clone()
    }
}

/// Client-facing message for validation failures
///
/// Duplicate identifiers are reported without echoing the submitted value.
pub(crate) fn validation_message(err: &InternalError) -> String {
    match err {
        InternalError::Credential(CredentialError::DuplicateEmail(_)) => {
            "A user with this email already exists".to_string()
        }
        InternalError::Credential(CredentialError::DuplicateUsername(_)) => {
            "A user with this username already exists".to_string()
        }
        InternalError::Credential(CredentialError::InvalidUsername(_)) => {
            "A username containing '@' must be the account's own email address".to_string()
        }
        InternalError::Credential(CredentialError::InvalidEmail(_)) => {
            "Enter a valid email address".to_string()
        }
        InternalError::Credential(CredentialError::PasswordValidationFailed(reason)) => {
            reason.clone()
        }
        other => other.to_string(),
    }
}

/// Request bodies or parameters the framework could not parse
pub(crate) fn auth_bad_request(err: poem::Error) -> AuthError {
    tracing::debug!("Rejected malformed auth request: {}", err);
    AuthError::validation_error(err.to_string())
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
