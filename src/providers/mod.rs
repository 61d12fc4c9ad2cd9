// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate. They perform actual work like hashing,
// validation and credential checks on top of the stores.

pub mod authentication_provider;
pub mod crypto_provider;
pub mod password_validator_provider;
pub mod token_provider;
pub mod user_provider;

// Re-export providers for clean imports
pub use authentication_provider::AuthenticationProvider;
pub use crypto_provider::CryptoProvider;
pub use password_validator_provider::{PasswordValidationError, PasswordValidatorProvider};
pub use token_provider::TokenProvider;
pub use user_provider::{AppliedPassword, Registration, UserProvider};
