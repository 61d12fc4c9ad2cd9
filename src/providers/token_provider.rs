use std::sync::Arc;

use crate::errors::InternalError;
use crate::providers::crypto_provider::CryptoProvider;
use crate::stores::TokenStore;

/// Issues and revokes opaque API tokens
///
/// A user holds at most one token. Repeated logins return the same key
/// until it is revoked by logout, deactivation or a password reset.
pub struct TokenProvider {
    token_store: Arc<TokenStore>,
    crypto_provider: Arc<CryptoProvider>,
}

impl TokenProvider {
    pub fn new(token_store: Arc<TokenStore>, crypto_provider: Arc<CryptoProvider>) -> Self {
        Self {
            token_store,
            crypto_provider,
        }
    }

    /// Return the user's live token, creating one if none exists
    pub async fn issue_token(&self, user_id: &str) -> Result<String, InternalError> {
        let candidate = self.crypto_provider.generate_token();
        let token = self.token_store.get_or_create(user_id, candidate).await?;
        Ok(token.key)
    }

    /// Revoke the user's token; `Ok(false)` when there was none
    pub async fn revoke_token(&self, user_id: &str) -> Result<bool, InternalError> {
        self.token_store.revoke_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{NewUser, UserStore};
    use crate::test::utils::{TEST_PEPPER, setup_test_db};

    async fn setup() -> (TokenProvider, String) {
        let db = setup_test_db().await;
        let user = UserStore::new(db.clone())
            .create_user(NewUser {
                email: "issuer@example.com".to_string(),
                username: None,
                password_hash: "hash".to_string(),
                first_name: None,
                last_name: None,
                is_active: true,
                is_approved: true,
                is_staff: false,
                is_superuser: false,
            })
            .await
            .unwrap();

        let provider = TokenProvider::new(
            Arc::new(TokenStore::new(db)),
            Arc::new(CryptoProvider::new(TEST_PEPPER)),
        );

        (provider, user.id)
    }

    #[tokio::test]
    async fn test_issue_token_is_stable_until_revoked() {
        let (provider, user_id) = setup().await;

        let first = provider.issue_token(&user_id).await.unwrap();
        let again = provider.issue_token(&user_id).await.unwrap();
        assert_eq!(first, again);

        assert!(provider.revoke_token(&user_id).await.unwrap());
        let fresh = provider.issue_token(&user_id).await.unwrap();
        assert_ne!(first, fresh);
    }

    #[tokio::test]
    async fn test_revoke_without_token() {
        let (provider, user_id) = setup().await;
        assert!(!provider.revoke_token(&user_id).await.unwrap());
    }
}
