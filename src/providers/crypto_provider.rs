use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

use crate::errors::InternalError;

/// Cryptographic operations provider
///
/// Provides peppered Argon2id password hashing, API token generation and
/// secure password generation.
pub struct CryptoProvider {
    password_pepper: String,
    dummy_hash: OnceLock<String>,
}

impl CryptoProvider {
    /// Create a new CryptoProvider
    ///
    /// # Arguments
    /// * `password_pepper` - Secret passed to Argon2 as its `secret` parameter
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
            dummy_hash: OnceLock::new(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password with Argon2id and a fresh random salt
    ///
    /// # Returns
    /// The PHC-formatted hash string
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash
    ///
    /// A malformed stored hash is an error; a mismatch is `Ok(false)`.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, InternalError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| InternalError::parse("password_hash", e.to_string()))?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Run a verification against a throwaway hash
    ///
    /// Used when the account does not exist so the response time matches a
    /// real password check.
    pub fn verify_dummy(&self, password: &str) {
        let dummy = match self.dummy_hash.get() {
            Some(hash) => hash,
            None => match self.hash_password("medixscan-dummy-password") {
                Ok(hash) => self.dummy_hash.get_or_init(|| hash),
                Err(_) => return,
            },
        };

        let _ = self.verify_password(password, dummy);
    }

    /// Generate an opaque API token: 32 random bytes, base64url without padding
    pub fn generate_token(&self) -> String {
        let bytes: [u8; 32] = rand::rng().random();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Generate a cryptographically secure random password
    ///
    /// 20 characters drawn from upper and lower case letters, digits and
    /// symbols.
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                 abcdefghijklmnopqrstuvwxyz\
                                 0123456789\
                                 !@#$%^&*()_+-=[]{}|;:,.<>?";

        let mut rng = rand::rng();
        (0..PASSWORD_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }
}
