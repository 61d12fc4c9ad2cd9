// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;


pub use admin::AdminApi;
pub use auth::AuthApi;
pub use health::HealthApi;
