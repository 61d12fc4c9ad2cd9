use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::crypto_provider::CryptoProvider;
use crate::stores::{TokenStore, UserStore};
use crate::types::db::user;

/// Verifies presented credentials and bearer tokens
pub struct AuthenticationProvider {
    user_store: Arc<UserStore>,
    token_store: Arc<TokenStore>,
    crypto_provider: Arc<CryptoProvider>,
}

impl AuthenticationProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        token_store: Arc<TokenStore>,
        crypto_provider: Arc<CryptoProvider>,
    ) -> Self {
        Self {
            user_store,
            token_store,
            crypto_provider,
        }
    }

    /// Verify an identifier (email or username) and password
    ///
    /// The password is checked before any status flag, so `AccountDisabled`
    /// and `PendingApproval` are only reported to a caller who knows the
    /// password. Unknown identifiers still pay for one Argon2 verification.
    ///
    /// # Returns
    /// * `Ok(user::Model)` - Credentials valid and the account may log in
    /// * `Err(InternalError)` - InvalidCredentials, AccountDisabled or PendingApproval
    pub async fn verify_credentials(&self, identifier: &str, password: &str) -> Result<user::Model, InternalError> {
        let Some(user) = self.user_store.find_by_identifier(identifier).await? else {
            self.crypto_provider.verify_dummy(password);
            return Err(CredentialError::InvalidCredentials.into());
        };

        let password_ok = match self.crypto_provider.verify_password(password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                // Unusable stored hash; nobody can log in with it
                tracing::error!(user_id = %user.id, "Stored password hash unreadable: {}", e);
                false
            }
        };
        if !password_ok {
            return Err(CredentialError::InvalidCredentials.into());
        }

        Self::ensure_login_eligible(&user)?;

        Ok(user)
    }

    /// Resolve a bearer token to its owner
    ///
    /// # Returns
    /// * `Ok(user::Model)` - Token is live and its owner active and approved
    /// * `Err(InternalError)` - InvalidToken, AccountDisabled or PendingApproval
    pub async fn verify_token(&self, key: &str) -> Result<user::Model, InternalError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::invalid_token("empty token").into());
        }

        let token = self
            .token_store
            .find_by_key(key)
            .await?
            .ok_or_else(|| InternalError::from(CredentialError::invalid_token("unknown token")))?;

        let user = self
            .user_store
            .find_by_id(&token.user_id)
            .await?
            .ok_or_else(|| InternalError::from(CredentialError::invalid_token("token owner missing")))?;

        Self::ensure_login_eligible(&user)?;

        Ok(user)
    }

    fn ensure_login_eligible(user: &user::Model) -> Result<(), InternalError> {
        if user.is_login_eligible() {
            return Ok(());
        }
        if !user.is_active {
            return Err(CredentialError::AccountDisabled.into());
        }
        if !user.is_approved {
            return Err(CredentialError::PendingApproval.into());
        }
        Ok(())
    }
}
