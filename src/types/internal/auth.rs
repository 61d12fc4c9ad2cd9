use crate::types::db::user;

/// Name of the fixed privileged role
pub const SUPERUSER_ROLE: &str = "SUPERUSER";

/// User projection returned by authentication and carried in the request context
///
/// Holds the status flags and the resolved role names; never the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProjection {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_approved: bool,
    pub roles: Vec<String>,
}

impl UserProjection {
    pub fn from_model(model: user::Model, roles: Vec<String>) -> Self {
        Self {
            id: model.id,
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            is_superuser: model.is_superuser,
            is_staff: model.is_staff,
            is_active: model.is_active,
            is_approved: model.is_approved,
            roles,
        }
    }

    pub fn has_role(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role.eq_ignore_ascii_case(role_name))
    }

    pub fn has_super_admin_access(&self) -> bool {
        has_super_admin_access(self)
    }
}

/// The only administrative gate: superuser flag or the SUPERUSER role
pub fn has_super_admin_access(user: &UserProjection) -> bool {
    user.is_superuser || user.has_role(SUPERUSER_ROLE)
}
