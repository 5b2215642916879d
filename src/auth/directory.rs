use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use super::password::{HashedPassword, PasswordError, PasswordService};

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error(transparent)]
    Hashing(#[from] PasswordError),
}

/// A registered user. Serializes without any password material.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(skip)]
    pub password: HashedPassword,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Store {
    records: Vec<UserRecord>,
    by_username: HashMap<String, usize>,
}

impl Store {
    fn get(&self, username: &str) -> Option<&UserRecord> {
        self.by_username.get(username).map(|&idx| &self.records[idx])
    }

    fn contains(&self, username: &str) -> bool {
        self.by_username.contains_key(username)
    }

    fn push(&mut self, record: UserRecord) {
        self.by_username.insert(record.username.clone(), self.records.len());
        self.records.push(record);
    }
}

/// In-memory user registry. Cloning shares the same store.
///
/// Writers are serialized by the lock: the uniqueness check and the insert
/// happen under a single write guard, so concurrent signups for one username
/// produce exactly one record.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    store: Arc<RwLock<Store>>,
    passwords: PasswordService,
}

impl UserDirectory {
    pub fn new(passwords: PasswordService) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::default())),
            passwords,
        }
    }

    pub fn passwords(&self) -> &PasswordService {
        &self.passwords
    }

    /// Register a new user, hashing the password before storage.
    ///
    /// Usernames match exactly (case-sensitive, no normalization).
    pub async fn register(&self, username: &str, password: &str) -> Result<UserRecord, DirectoryError> {
        if username.trim().is_empty() {
            return Err(DirectoryError::InvalidUsername);
        }

        // Skip the hashing cost for obvious duplicates
        if self.store.read().await.contains(username) {
            return Err(DirectoryError::DuplicateUsername(username.to_string()));
        }

        let password = self.passwords.hash(password).await?;

        let mut store = self.store.write().await;
        if store.contains(username) {
            return Err(DirectoryError::DuplicateUsername(username.to_string()));
        }

        let record = UserRecord {
            username: username.to_string(),
            password,
            created_at: Utc::now(),
        };
        store.push(record.clone());

        Ok(record)
    }

    pub async fn find(&self, username: &str) -> Option<UserRecord> {
        self.store.read().await.get(username).cloned()
    }

    /// All records in registration order
    pub async fn list(&self) -> Vec<UserRecord> {
        self.store.read().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn directory() -> UserDirectory {
        UserDirectory::new(PasswordService::new(AppConfig::for_tests().password).unwrap())
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let directory = directory();

        directory.register("alice", "pw").await.unwrap();
        let err = directory.register("alice", "different").await.unwrap_err();

        assert!(matches!(err, DirectoryError::DuplicateUsername(name) if name == "alice"));
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let directory = directory();

        directory.register("alice", "pw").await.unwrap();
        directory.register("Alice", "pw").await.unwrap();

        assert!(directory.find("alice").await.is_some());
        assert!(directory.find("Alice").await.is_some());
        assert!(directory.find("ALICE").await.is_none());
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let directory = directory();

        assert!(matches!(directory.register("", "pw").await, Err(DirectoryError::InvalidUsername)));
        assert!(matches!(directory.register("   ", "pw").await, Err(DirectoryError::InvalidUsername)));
        assert!(directory.is_empty().await);
    }

    #[tokio::test]
    async fn test_password_is_not_stored_verbatim() {
        let directory = directory();
        let record = directory.register("bob", "hunter2").await.unwrap();

        assert_ne!(record.password.as_str(), "hunter2");
        assert!(directory.passwords().verify_sync("hunter2", &record.password));
    }

    #[tokio::test]
    async fn test_list_preserves_registration_order() {
        let directory = directory();
        for name in ["carol", "alice", "bob"] {
            directory.register(name, "pw").await.unwrap();
        }

        let names: Vec<String> = directory.list().await.into_iter().map(|r| r.username).collect();
        assert_eq!(names, vec!["carol", "alice", "bob"]);
    }

    #[tokio::test]
    async fn test_serialized_record_has_no_password() {
        let directory = directory();
        let record = directory.register("dave", "secret-pw").await.unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["username"], "dave");
        assert!(value.get("password").is_none());
        assert!(value.get("created_at").is_some());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let directory = directory();
        let other = directory.clone();

        directory.register("erin", "pw").await.unwrap();
        assert!(other.find("erin").await.is_some());
    }
}
