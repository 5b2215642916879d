use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Minimum signing secret length accepted outside development.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub password: PasswordConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Token lifetime; `None` issues tokens without an `exp` claim.
    pub token_ttl_secs: Option<u64>,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("enable_cors", &self.enable_cors)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Mounts the unauthenticated `GET /users` listing
    pub expose_users: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingSecret,

    #[error("JWT_SECRET must be at least {min} bytes in {environment:?}")]
    WeakSecret { environment: Environment, min: usize },
}

impl Default for PasswordConfig {
    // Argon2 crate defaults (19 MiB, 2 passes, 1 lane)
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides();

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("PASSGATE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.server.static_dir = v;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("TOKEN_TTL_SECS") {
            // Empty or zero disables expiry
            self.security.token_ttl_secs = v.parse().ok().filter(|secs| *secs > 0);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }

        // Password hashing overrides
        if let Ok(v) = env::var("PASSWORD_MEMORY_KIB") {
            self.password.memory_kib = v.parse().unwrap_or(self.password.memory_kib);
        }
        if let Ok(v) = env::var("PASSWORD_ITERATIONS") {
            self.password.iterations = v.parse().unwrap_or(self.password.iterations);
        }
        if let Ok(v) = env::var("PASSWORD_PARALLELISM") {
            self.password.parallelism = v.parse().unwrap_or(self.password.parallelism);
        }

        // Debug overrides
        if let Ok(v) = env::var("DEBUG_EXPOSE_USERS") {
            self.debug.expose_users = v.parse().unwrap_or(self.debug.expose_users);
        }

        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if self.environment != Environment::Development
            && self.security.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ConfigError::WeakSecret {
                environment: self.environment,
                min: MIN_PRODUCTION_SECRET_LEN,
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                static_dir: "public".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: None,
                enable_cors: true,
                cors_origins: Vec::new(), // permissive
            },
            password: PasswordConfig::default(),
            debug: DebugConfig { expose_users: true },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                static_dir: "public".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: Some(24 * 60 * 60),
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            password: PasswordConfig::default(),
            debug: DebugConfig { expose_users: false },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                static_dir: "public".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                token_ttl_secs: Some(4 * 60 * 60),
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            password: PasswordConfig::default(),
            debug: DebugConfig { expose_users: false },
        }
    }

    /// Development preset with a fixed secret and cheap hashing, for tests.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let mut config = Self::development();
        config.security.jwt_secret = "test-secret-key-for-testing-only-32chars".to_string();
        config.password = PasswordConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        };
        config
    }
}
