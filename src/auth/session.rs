use thiserror::Error;

use super::directory::{UserDirectory, UserRecord};
use super::token::{TokenError, TokenVerifier};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No authorization header")]
    MissingHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[source] TokenError),

    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Resolves an `Authorization` header value to a live user record.
///
/// Stateless: every call re-verifies the token and re-reads the directory, so
/// a correctly signed token for a user who is not registered is `UserNotFound`.
#[derive(Clone)]
pub struct SessionResolver {
    verifier: TokenVerifier,
    directory: UserDirectory,
}

impl SessionResolver {
    pub fn new(verifier: TokenVerifier, directory: UserDirectory) -> Self {
        Self { verifier, directory }
    }

    pub async fn resolve(&self, header: Option<&str>) -> Result<UserRecord, SessionError> {
        let header = header.ok_or(SessionError::MissingHeader)?;

        let claims = self.verifier.verify(header).map_err(SessionError::InvalidToken)?;

        let record = self.directory.find(&claims.username).await;
        record.ok_or(SessionError::UserNotFound(claims.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::PasswordService;
    use crate::auth::token::TokenIssuer;
    use crate::config::AppConfig;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn setup() -> (UserDirectory, TokenIssuer, SessionResolver) {
        let directory = UserDirectory::new(PasswordService::new(AppConfig::for_tests().password).unwrap());
        let resolver = SessionResolver::new(TokenVerifier::new(SECRET), directory.clone());
        (directory, TokenIssuer::new(SECRET, None), resolver)
    }

    #[tokio::test]
    async fn test_resolves_registered_user() {
        let (directory, issuer, resolver) = setup();
        directory.register("alice", "pw").await.unwrap();
        let token = issuer.issue("alice").unwrap();

        let header = format!("Bearer {}", token);
        let record = resolver.resolve(Some(&header)).await.unwrap();
        assert_eq!(record.username, "alice");
    }

    #[tokio::test]
    async fn test_bare_token_accepted() {
        let (directory, issuer, resolver) = setup();
        directory.register("alice", "pw").await.unwrap();
        let token = issuer.issue("alice").unwrap();

        let record = resolver.resolve(Some(token.as_str())).await.unwrap();
        assert_eq!(record.username, "alice");
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (_, _, resolver) = setup();
        assert!(matches!(resolver.resolve(None).await, Err(SessionError::MissingHeader)));
    }

    #[tokio::test]
    async fn test_bad_tokens_collapse_to_invalid_token() {
        let (directory, _, resolver) = setup();
        directory.register("alice", "pw").await.unwrap();
        let foreign = TokenIssuer::new(b"other-secret", None).issue("alice").unwrap();

        let header = format!("Bearer {}", foreign);
        assert!(matches!(
            resolver.resolve(Some(&header)).await,
            Err(SessionError::InvalidToken(TokenError::InvalidSignature))
        ));
        assert!(matches!(
            resolver.resolve(Some("Bearer garbage")).await,
            Err(SessionError::InvalidToken(TokenError::Malformed))
        ));
    }

    #[tokio::test]
    async fn test_valid_token_for_unknown_user_is_not_found() {
        let (_, issuer, resolver) = setup();
        let token = issuer.issue("ghost").unwrap();

        let header = format!("Bearer {}", token);
        let err = resolver.resolve(Some(&header)).await.unwrap_err();
        assert!(matches!(err, SessionError::UserNotFound(name) if name == "ghost"));
    }
}
