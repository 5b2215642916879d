use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

const BEARER_PREFIX: &str = "Bearer ";

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("JWT generation error: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Encoded token string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signs HS256 tokens asserting a username.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_secs: Option<i64>,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: Option<u64>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            ttl_secs: ttl_secs.map(|secs| i64::try_from(secs).unwrap_or(i64::MAX)),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.as_bytes(), security.token_ttl_secs)
    }

    pub fn issue(&self, username: &str) -> Result<Token, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            username: username.to_string(),
            iat: now,
            exp: self.ttl_secs.map(|ttl| now.saturating_add(ttl)),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map(Token)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

/// Validates token signatures and extracts claims.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional; when present it is still checked
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.as_bytes())
    }

    /// Verify a bare token or a `Bearer <token>` header value.
    pub fn verify(&self, raw: &str) -> Result<Claims, TokenError> {
        let token = strip_bearer(raw);
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

/// Strip an optional `Bearer ` prefix and surrounding whitespace
pub fn strip_bearer(raw: &str) -> &str {
    let raw = raw.trim_start();
    raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim()
}
