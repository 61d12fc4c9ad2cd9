use poem_openapi::{Enum, Object};

use crate::types::db::role;
use crate::types::dto::user::UserResponse;

/// Status filter for the user listing
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[oai(rename_all = "lowercase")]
pub enum UserStatusFilter {
    /// Active users awaiting approval
    Pending,
    /// Active and approved users
    Active,
    /// Deactivated users
    Inactive,
}

/// Response model for the user listing
#[derive(Object, Debug)]
pub struct UserListResponse {
    /// Number of users returned
    pub count: u64,

    /// Users ordered by creation time
    pub users: Vec<UserResponse>,
}

/// Request to assign a role to a user
#[derive(Object, Debug)]
pub struct AssignRoleRequest {
    /// Role name (case-insensitive, e.g. `RADIOLOGIST`)
    pub role: String,
}

/// Response after an administrative action on a user
#[derive(Object, Debug)]
pub struct UserActionResponse {
    /// Whether the operation was successful
    pub success: bool,

    /// Human-readable message describing the result
    pub message: String,

    /// The user after the action was applied
    pub user: UserResponse,
}

/// A role from the catalogue
#[derive(Object, Debug)]
pub struct RoleResponse {
    /// Uppercase role identifier
    pub name: String,

    /// Human-readable label
    pub display_name: String,

    /// What the role grants
    pub description: String,
}

impl From<role::Model> for RoleResponse {
    fn from(role: role::Model) -> Self {
        Self {
            name: role.name,
            display_name: role.display_name,
            description: role.description,
        }
    }
}

/// Response model for the role catalogue
#[derive(Object, Debug)]
pub struct RoleListResponse {
    /// All roles, ordered by name
    pub roles: Vec<RoleResponse>,
}
