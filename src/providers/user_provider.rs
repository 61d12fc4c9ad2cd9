use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::{CryptoProvider, PasswordValidatorProvider, TokenProvider};
use crate::stores::{NewUser, RoleStore, UserStore};
use crate::types::db::user;
use crate::types::internal::auth::UserProjection;

/// Fields accepted when a user registers
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Password applied by a CLI account operation
///
/// `generated` is set when the caller did not supply one; it must be shown
/// to the operator exactly once.
#[derive(Debug)]
pub struct AppliedPassword {
    pub generated: Option<String>,
}

/// Account lifecycle operations and user projections
pub struct UserProvider {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    token_provider: Arc<TokenProvider>,
    crypto_provider: Arc<CryptoProvider>,
    password_validator: Arc<PasswordValidatorProvider>,
}

impl UserProvider {
    pub fn new(
        user_store: Arc<UserStore>,
        role_store: Arc<RoleStore>,
        token_provider: Arc<TokenProvider>,
        crypto_provider: Arc<CryptoProvider>,
        password_validator: Arc<PasswordValidatorProvider>,
    ) -> Self {
        Self {
            user_store,
            role_store,
            token_provider,
            crypto_provider,
            password_validator,
        }
    }

    /// Attach role names to a user row
    pub async fn project(&self, model: user::Model) -> Result<UserProjection, InternalError> {
        let roles = self.role_store.roles_for_user(&model.id).await?;
        Ok(UserProjection::from_model(model, roles))
    }

    /// Attach role names to many user rows with a single role query
    pub async fn project_many(&self, models: Vec<user::Model>) -> Result<Vec<UserProjection>, InternalError> {
        let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
        let mut roles = self.role_store.roles_for_users(&ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let user_roles = roles.remove(&model.id).unwrap_or_default();
                UserProjection::from_model(model, user_roles)
            })
            .collect())
    }

    /// Load a user's projection by id, or `UserNotFound`
    pub async fn load_projection(&self, user_id: &str) -> Result<UserProjection, InternalError> {
        let model = self.user_store.get_by_id(user_id).await?;
        self.project(model).await
    }

    async fn get_by_email(&self, email: &str) -> Result<user::Model, InternalError> {
        self.user_store
            .find_by_email(email)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(email.trim().to_string()).into())
    }

    fn validate_password(&self, password: &str) -> Result<(), InternalError> {
        self.password_validator
            .validate(password)
            .map_err(|e| InternalError::from(CredentialError::from(e)))
    }

    /// Register a new, unapproved account without roles
    ///
    /// # Returns
    /// * `Ok(UserProjection)` - The created user
    /// * `Err(InternalError)` - InvalidEmail, PasswordValidationFailed, InvalidUsername, DuplicateEmail or DuplicateUsername
    pub async fn register(&self, registration: Registration) -> Result<UserProjection, InternalError> {
        self.password_validator.validate_email(&registration.email)?;
        self.validate_password(&registration.password)?;

        let password_hash = self.crypto_provider.hash_password(&registration.password)?;
        let created = self
            .user_store
            .create_user(NewUser {
                email: registration.email,
                username: registration.username,
                password_hash,
                first_name: non_blank(registration.first_name),
                last_name: non_blank(registration.last_name),
                is_active: true,
                is_approved: false,
                is_staff: false,
                is_superuser: false,
            })
            .await?;

        Ok(UserProjection::from_model(created, Vec::new()))
    }

    /// Create a super-admin account, or promote an existing one
    ///
    /// A new account gets the given password or a generated one. An existing
    /// account keeps its password unless one is given.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: Option<String>,
        username: Option<String>,
    ) -> Result<(UserProjection, AppliedPassword), InternalError> {
        self.password_validator.validate_email(email)?;
        if let Some(password) = &password {
            self.validate_password(password)?;
        }

        let (user_id, applied) = match self.user_store.find_by_email(email).await? {
            Some(existing) => {
                if let Some(password) = password {
                    let hash = self.crypto_provider.hash_password(&password)?;
                    self.user_store.set_password_hash(&existing.id, hash).await?;
                }
                tracing::info!(user_id = %existing.id, "Promoting existing user to superuser");
                (existing.id, AppliedPassword { generated: None })
            }
            None => {
                let (password, generated) = match password {
                    Some(password) => (password, None),
                    None => {
                        let generated = self.crypto_provider.generate_secure_password();
                        (generated.clone(), Some(generated))
                    }
                };
                let password_hash = self.crypto_provider.hash_password(&password)?;
                let created = self
                    .user_store
                    .create_user(NewUser {
                        email: email.to_string(),
                        username,
                        password_hash,
                        first_name: None,
                        last_name: None,
                        is_active: true,
                        is_approved: true,
                        is_staff: true,
                        is_superuser: true,
                    })
                    .await?;
                (created.id, AppliedPassword { generated })
            }
        };

        let promoted = self.user_store.promote_to_superuser(&user_id).await?;
        Ok((self.project(promoted).await?, applied))
    }

    /// Set a new password and revoke the user's token
    pub async fn reset_password(
        &self,
        email: &str,
        password: Option<String>,
    ) -> Result<(UserProjection, AppliedPassword), InternalError> {
        let user = self.get_by_email(email).await?;

        let (password, generated) = match password {
            Some(password) => {
                self.validate_password(&password)?;
                (password, None)
            }
            None => {
                let generated = self.crypto_provider.generate_secure_password();
                (generated.clone(), Some(generated))
            }
        };

        let hash = self.crypto_provider.hash_password(&password)?;
        let updated = self.user_store.set_password_hash(&user.id, hash).await?;
        self.token_provider.revoke_token(&user.id).await?;

        tracing::info!(user_id = %user.id, "Password reset");

        Ok((self.project(updated).await?, AppliedPassword { generated }))
    }

    /// Approve a pending account identified by email
    pub async fn approve_by_email(&self, email: &str) -> Result<UserProjection, InternalError> {
        let user = self.get_by_email(email).await?;
        let approved = self.user_store.set_approved(&user.id, true).await?;
        self.project(approved).await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::TokenStore;
    use crate::test::utils::{TEST_PEPPER, setup_test_db};
    use crate::types::internal::auth::SUPERUSER_ROLE;

    struct Fixture {
        provider: UserProvider,
        users: Arc<UserStore>,
        tokens: Arc<TokenProvider>,
        crypto: Arc<CryptoProvider>,
    }

    async fn fixture() -> Fixture {
        let db = setup_test_db().await;
        let users = Arc::new(UserStore::new(db.clone()));
        let roles = Arc::new(RoleStore::new(db.clone()));
        let crypto = Arc::new(CryptoProvider::new(TEST_PEPPER));
        let tokens = Arc::new(TokenProvider::new(Arc::new(TokenStore::new(db)), crypto.clone()));
        let provider = UserProvider::new(
            users.clone(),
            roles,
            tokens.clone(),
            crypto.clone(),
            Arc::new(PasswordValidatorProvider::new()),
        );

        Fixture {
            provider,
            users,
            tokens,
            crypto,
        }
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: password.to_string(),
            username: None,
            first_name: Some("  Gregory ".to_string()),
            last_name: Some("   ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_creates_unapproved_user_without_roles() {
        let f = fixture().await;

        let user = f.provider.register(registration("New@Example.com", "long-enough")).await.unwrap();

        assert_eq!(user.email, "new@example.com");
        assert!(user.is_active);
        assert!(!user.is_approved);
        assert!(user.roles.is_empty());
        assert_eq!(user.first_name.as_deref(), Some("Gregory"));
        assert_eq!(user.last_name, None);

        let stored = f.users.get_by_id(&user.id).await.unwrap();
        assert!(f.crypto.verify_password("long-enough", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_validation_failures() {
        let f = fixture().await;

        assert!(matches!(
            f.provider.register(registration("not-an-email", "long-enough")).await,
            Err(InternalError::Credential(CredentialError::InvalidEmail(_)))
        ));
        assert!(matches!(
            f.provider.register(registration("ok@example.com", "short")).await,
            Err(InternalError::Credential(CredentialError::PasswordValidationFailed(_)))
        ));

        f.provider.register(registration("ok@example.com", "long-enough")).await.unwrap();
        assert!(matches!(
            f.provider.register(registration("OK@example.com", "long-enough")).await,
            Err(InternalError::Credential(CredentialError::DuplicateEmail(_)))
        ));
    }

    #[tokio::test]
    async fn test_create_superuser_generates_password_when_omitted() {
        let f = fixture().await;

        let (user, applied) = f
            .provider
            .create_superuser("root@example.com", None, Some("root".to_string()))
            .await
            .unwrap();

        let generated = applied.generated.expect("password should be generated");
        assert_eq!(generated.len(), 20);
        assert!(user.is_superuser && user.is_staff && user.is_active && user.is_approved);
        assert_eq!(user.roles, vec![SUPERUSER_ROLE.to_string()]);
        assert_eq!(user.username, "root");

        let stored = f.users.get_by_id(&user.id).await.unwrap();
        assert!(f.crypto.verify_password(&generated, &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_superuser_promotes_existing_user() {
        let f = fixture().await;
        let registered = f.provider.register(registration("staff@example.com", "original-pass")).await.unwrap();

        let (user, applied) = f
            .provider
            .create_superuser("staff@example.com", None, None)
            .await
            .unwrap();

        assert_eq!(user.id, registered.id);
        assert!(applied.generated.is_none());
        assert!(user.has_super_admin_access());

        let stored = f.users.get_by_id(&user.id).await.unwrap();
        assert!(f.crypto.verify_password("original-pass", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_reset_password_revokes_token() {
        let f = fixture().await;
        let user = f.provider.register(registration("reset@example.com", "old-password")).await.unwrap();
        let old_token = f.tokens.issue_token(&user.id).await.unwrap();

        let (_, applied) = f
            .provider
            .reset_password("RESET@example.com", Some("new-password".to_string()))
            .await
            .unwrap();

        assert!(applied.generated.is_none());
        let stored = f.users.get_by_id(&user.id).await.unwrap();
        assert!(f.crypto.verify_password("new-password", &stored.password_hash).unwrap());
        assert_ne!(f.tokens.issue_token(&user.id).await.unwrap(), old_token);
    }

    #[tokio::test]
    async fn test_reset_password_unknown_email() {
        let f = fixture().await;
        assert!(matches!(
            f.provider.reset_password("nobody@example.com", None).await,
            Err(InternalError::Credential(CredentialError::UserNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_approve_by_email() {
        let f = fixture().await;
        f.provider.register(registration("wait@example.com", "waiting-pass")).await.unwrap();

        let approved = f.provider.approve_by_email("wait@example.com").await.unwrap();
        assert!(approved.is_approved);
    }

    #[tokio::test]
    async fn test_project_many_attaches_roles() {
        let f = fixture().await;
        let (admin, _) = f.provider.create_superuser("a@example.com", Some("admin-pass".into()), None).await.unwrap();
        let plain = f.provider.register(registration("b@example.com", "plain-pass")).await.unwrap();

        let models = vec![
            f.users.get_by_id(&admin.id).await.unwrap(),
            f.users.get_by_id(&plain.id).await.unwrap(),
        ];
        let projections = f.provider.project_many(models).await.unwrap();

        assert_eq!(projections[0].roles, vec![SUPERUSER_ROLE.to_string()]);
        assert!(projections[1].roles.is_empty());
    }
}
