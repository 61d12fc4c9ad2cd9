use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::SecretManager;
use crate::providers::{
    AuthenticationProvider, CryptoProvider, PasswordValidatorProvider, TokenProvider, UserProvider,
};
use crate::stores::{RoleStore, TokenStore, UserStore};

/// Stores built once over the shared connection pool
pub struct Stores {
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub token_store: Arc<TokenStore>,
}

/// Providers built once on top of the stores
pub struct Providers {
    pub crypto_provider: Arc<CryptoProvider>,
    pub password_validator: Arc<PasswordValidatorProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub user_provider: Arc<UserProvider>,
}

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across
/// coordinators, the HTTP surface and CLI commands.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, secret_manager)
///   ↓ creates once
///   ├─ stores    (UserStore, RoleStore, TokenStore)
///   └─ providers (Crypto, PasswordValidator, Authentication, Token, User)
///   ↓ wrapped in Arc<AppData>
///   ├─ LoginCoordinator::new(app_data)
///   ├─ UserCoordinator::new(app_data)
///   └─ AdminCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub stores: Stores,
    pub providers: Providers,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database should be connected and migrated before calling this.
    pub fn init(db: DatabaseConnection, secret_manager: SecretManager) -> Self {
        tracing::debug!("Initializing AppData...");
        let secret_manager = Arc::new(secret_manager);

        let stores = Stores {
            user_store: Arc::new(UserStore::new(db.clone())),
            role_store: Arc::new(RoleStore::new(db.clone())),
            token_store: Arc::new(TokenStore::new(db.clone())),
        };

        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.password_pepper()));
        let password_validator = Arc::new(PasswordValidatorProvider::new());
        let authentication_provider = Arc::new(AuthenticationProvider::new(
            stores.user_store.clone(),
            stores.token_store.clone(),
            crypto_provider.clone(),
        ));
        let token_provider = Arc::new(TokenProvider::new(
            stores.token_store.clone(),
            crypto_provider.clone(),
        ));
        let user_provider = Arc::new(UserProvider::new(
            stores.user_store.clone(),
            stores.role_store.clone(),
            token_provider.clone(),
            crypto_provider.clone(),
            password_validator.clone(),
        ));

        tracing::debug!("AppData initialized");

        Self {
            db,
            secret_manager,
            stores,
            providers: Providers {
                crypto_provider,
                password_validator,
                authentication_provider,
                token_provider,
                user_provider,
            },
        }
    }
}
