//! Credential and session core: user registry, password checks, and
//! stateless signed tokens.

pub mod credentials;
pub mod directory;
pub mod password;
pub mod session;
pub mod token;

pub use credentials::CredentialVerifier;
pub use directory::{DirectoryError, UserDirectory, UserRecord};
pub use password::{HashedPassword, PasswordError, PasswordService};
pub use session::{SessionError, SessionResolver};
pub use token::{Claims, Token, TokenError, TokenIssuer, TokenVerifier};
