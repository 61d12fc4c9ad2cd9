// Database entities - SeaORM models
pub mod auth_token;
pub mod role;
pub mod user;
pub mod user_role;
