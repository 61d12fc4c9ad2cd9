// Stores layer - Data access and repository pattern
pub mod role_store;
pub mod token_store;
pub mod user_store;

pub use role_store::RoleStore;
pub use token_store::TokenStore;
pub use user_store::{NewUser, UserStatus, UserStore};

use sea_orm::{DbErr, SqlErr};

/// True when the database rejected a write on a UNIQUE or primary key constraint
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
