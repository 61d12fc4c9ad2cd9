use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}
