use poem_openapi::{ApiResponse, Object, payload::Json};
use serde::{Deserialize, Serialize};

use crate::types::dto::user::UserResponse;

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address (preferred login handle)
    pub email: Option<String>,

    /// Username, accepted when email is absent
    pub username: Option<String>,

    /// Password for authentication
    pub password: String,
}

impl LoginRequest {
    /// The identifier to resolve, email taking precedence over username
    pub fn identifier(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Response model for a successful login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque bearer token; reused across logins until revoked
    pub token: String,

    /// The authenticated user
    pub user: UserResponse,
}

/// Request model for self-registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Email address, used as the canonical login handle
    pub email: String,

    /// Password (8 to 128 characters)
    pub password: String,

    /// Optional username; defaults to the email address
    pub username: Option<String>,

    /// Given name
    pub first_name: Option<String>,

    /// Family name
    pub last_name: Option<String>,
}

/// Response model for registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Human-readable message describing the result
    pub message: String,

    /// The newly created (unapproved) user
    pub user: UserResponse,
}

/// API response for register endpoint
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created and awaiting approval
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}
