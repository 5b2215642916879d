use super::directory::{UserDirectory, UserRecord};

/// Checks a username/password pair against the directory.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    directory: UserDirectory,
}

impl CredentialVerifier {
    pub fn new(directory: UserDirectory) -> Self {
        Self { directory }
    }

    /// Returns the record only when the user exists and the password verifies.
    ///
    /// Unknown user and wrong password are indistinguishable to the caller.
    pub async fn check(&self, username: &str, password: &str) -> Option<UserRecord> {
        let passwords = self.directory.passwords();

        match self.directory.find(username).await {
            Some(record) => {
                if passwords.verify(password, &record.password).await {
                    Some(record)
                } else {
                    None
                }
            }
            None => {
                passwords.verify_dummy(password).await;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::PasswordService;
    use crate::config::AppConfig;

    async fn verifier_with(users: &[(&str, &str)]) -> CredentialVerifier {
        let directory = UserDirectory::new(PasswordService::new(AppConfig::for_tests().password).unwrap());
        for (username, password) in users {
            directory.register(username, password).await.unwrap();
        }
        CredentialVerifier::new(directory)
    }

    #[tokio::test]
    async fn test_matching_credentials() {
        let verifier = verifier_with(&[("alice", "pw")]).await;

        let record = verifier.check("alice", "pw").await.unwrap();
        assert_eq!(record.username, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let verifier = verifier_with(&[("alice", "pw")]).await;

        assert!(verifier.check("alice", "wrong").await.is_none());
        assert!(verifier.check("alice", "PW").await.is_none());
        assert!(verifier.check("alice", "").await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let verifier = verifier_with(&[("alice", "pw")]).await;

        assert!(verifier.check("mallory", "pw").await.is_none());
        assert!(verifier.check("Alice", "pw").await.is_none());
    }

    #[tokio::test]
    async fn test_passwords_are_per_user() {
        let verifier = verifier_with(&[("alice", "alice-pw"), ("bob", "bob-pw")]).await;

        assert!(verifier.check("alice", "bob-pw").await.is_none());
        assert!(verifier.check("bob", "bob-pw").await.is_some());
    }
}
