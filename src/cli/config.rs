use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

const SESSION_FILE: &str = "session.json";

/// Persisted CLI session: last server used and the token from the last signin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub server: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl SessionConfig {
    pub fn load_from(config_dir: &Path) -> anyhow::Result<Self> {
        let session_file = config_dir.join(SESSION_FILE);

        if !session_file.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(session_file)?;
        let config: SessionConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_dir: &Path) -> anyhow::Result<()> {
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        write_private(&config_dir.join(SESSION_FILE), content.as_bytes())?;
        Ok(())
    }

    pub fn signed_in(&mut self, server: &str, username: &str, token: String) {
        self.server = Some(server.to_string());
        self.username = Some(username.to_string());
        self.token = Some(token);
        self.signed_in_at = Some(Utc::now());
    }

    /// Forget the token; returns whether one was stored
    pub fn sign_out(&mut self) -> bool {
        self.username = None;
        self.signed_in_at = None;
        self.token.take().is_some()
    }
}

// Session file holds a bearer token; owner read/write only
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on create
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::File::create(path)?.write_all(contents)
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(custom_dir) = std::env::var("PASSGATE_CLI_CONFIG_DIR") {
        return Ok(PathBuf::from(custom_dir));
    }

    let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
    Ok(PathBuf::from(home).join(".config").join("passgate"))
}

pub fn load_session() -> anyhow::Result<SessionConfig> {
    SessionConfig::load_from(&get_config_dir()?)
}

pub fn save_session(config: &SessionConfig) -> anyhow::Result<()> {
    config.save_to(&get_config_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("passgate-cli-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = scratch_dir("missing");
        let session = SessionConfig::load_from(&dir).unwrap();
        assert!(session.token.is_none());
        assert!(session.server.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = scratch_dir("reload");
        let mut session = SessionConfig::default();
        session.signed_in("http://localhost:3000", "alice", "tok".to_string());
        session.save_to(&dir).unwrap();

        let loaded = SessionConfig::load_from(&dir).unwrap();
        assert_eq!(loaded.username.as_deref(), Some("alice"));
        assert_eq!(loaded.token.as_deref(), Some("tok"));
        assert!(loaded.signed_in_at.is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = scratch_dir("perms");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SESSION_FILE);
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut session = SessionConfig::default();
        session.signed_in("http://localhost:3000", "alice", "tok".to_string());
        session.save_to(&dir).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(SessionConfig::load_from(&dir).unwrap().token.as_deref(), Some("tok"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sign_out_keeps_server() {
        let mut session = SessionConfig::default();
        session.signed_in("http://localhost:3000", "alice", "tok".to_string());

        assert!(session.sign_out());
        assert!(!session.sign_out());
        assert_eq!(session.server.as_deref(), Some("http://localhost:3000"));
        assert!(session.token.is_none());
    }
}
