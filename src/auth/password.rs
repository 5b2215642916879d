use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;
use thiserror::Error;

use crate::config::PasswordConfig;

// Verified against when the username is unknown so both failure paths pay the same cost
const DUMMY_PASSWORD: &str = "passgate-dummy-password";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid Argon2 parameters: {0}")]
    Params(String),

    #[error("Password hash failed: {0}")]
    Hash(String),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// PHC-format Argon2id hash of a password. The plain text is never kept.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

// Don't expose hash in debug output
impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HashedPassword").field(&"[REDACTED]").finish()
    }
}

impl HashedPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Salted one-way password hashing with configurable Argon2id cost.
///
/// Hashing is CPU bound; the async methods run it on the blocking pool.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    dummy_hash: Arc<HashedPassword>,
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService").finish_non_exhaustive()
    }
}

impl PasswordService {
    pub fn new(config: PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let dummy_hash = hash_with(&argon2, DUMMY_PASSWORD)?;

        Ok(Self {
            argon2,
            dummy_hash: Arc::new(dummy_hash),
        })
    }

    /// Hash a plain text password with a fresh random salt.
    pub fn hash_sync(&self, plain_text: &str) -> Result<HashedPassword, PasswordError> {
        hash_with(&self.argon2, plain_text)
    }

    /// Verify a plain text password. Unparseable hashes never verify.
    pub fn verify_sync(&self, plain_text: &str, hashed: &HashedPassword) -> bool {
        match PasswordHash::new(hashed.as_str()) {
            Ok(parsed) => self
                .argon2
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Stored password hash is not a valid PHC string: {}", e);
                false
            }
        }
    }

    pub async fn hash(&self, plain_text: &str) -> Result<HashedPassword, PasswordError> {
        let service = self.clone();
        let plain_text = plain_text.to_string();
        tokio::task::spawn_blocking(move || service.hash_sync(&plain_text)).await?
    }

    pub async fn verify(&self, plain_text: &str, hashed: &HashedPassword) -> bool {
        let service = self.clone();
        let plain_text = plain_text.to_string();
        let hashed = hashed.clone();
        match tokio::task::spawn_blocking(move || service.verify_sync(&plain_text, &hashed)).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Burn one verification against a fixed hash. Always false.
    pub async fn verify_dummy(&self, plain_text: &str) -> bool {
        self.verify(plain_text, &self.dummy_hash).await;
        false
    }
}

fn hash_with(argon2: &Argon2<'_>, plain_text: &str) -> Result<HashedPassword, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plain_text.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(HashedPassword(hash.to_string()))
}
