use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Request is not authenticated")]
    NotAuthenticated,

    #[error("Super admin access required for {action}")]
    SuperAdminRequired { action: String },

    #[error("Cannot {action} your own account")]
    SelfModificationDenied { action: String },
}

impl AccessError {
    pub fn super_admin_required(action: &str) -> Self {
        Self::SuperAdminRequired {
            action: action.to_string(),
        }
    }

    pub fn self_modification_denied(action: &str) -> Self {
        Self::SelfModificationDenied {
            action: action.to_string(),
        }
    }
}
