use std::sync::Arc;

use crate::auth::{
    CredentialVerifier, PasswordError, PasswordService, SessionResolver, TokenIssuer, TokenVerifier,
    UserDirectory,
};
use crate::config::AppConfig;

/// Shared handler state. Cheap to clone; every clone sees the same directory.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub directory: UserDirectory,
    pub credentials: CredentialVerifier,
    pub issuer: TokenIssuer,
    pub sessions: SessionResolver,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, PasswordError> {
        let passwords = PasswordService::new(config.password)?;
        let directory = UserDirectory::new(passwords);

        Ok(Self {
            credentials: CredentialVerifier::new(directory.clone()),
            issuer: TokenIssuer::from_config(&config.security),
            sessions: SessionResolver::new(TokenVerifier::from_config(&config.security), directory.clone()),
            directory,
            config: Arc::new(config),
        })
    }
}
