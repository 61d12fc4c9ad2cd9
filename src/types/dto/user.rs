use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::internal::auth::UserProjection;

/// Public projection of a user account
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID (UUID)
    pub id: String,

    /// Email address (lowercased)
    pub email: String,

    /// Username
    pub username: String,

    /// Given name
    pub first_name: Option<String>,

    /// Family name
    pub last_name: Option<String>,

    /// Unrestricted administrative access flag
    pub is_superuser: bool,

    /// Staff flag
    pub is_staff: bool,

    /// Whether the account is enabled
    pub is_active: bool,

    /// Whether the account has been approved by an administrator
    pub is_approved: bool,

    /// Names of the roles assigned to the user
    pub roles: Vec<String>,
}

impl From<UserProjection> for UserResponse {
    fn from(user: UserProjection) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_superuser: user.is_superuser,
            is_staff: user.is_staff,
            is_active: user.is_active,
            is_approved: user.is_approved,
            roles: user.roles,
        }
    }
}
