//! Session storage and signing configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::ConfigError;

/// Default storage key for the persisted session.
pub const DEFAULT_SESSION_KEY: &str = "nwr_audit_user";

/// Longest accepted session lifetime (100 years).
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Configuration for persisted sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage key: the cookie name in the dashboard, the file name in the CLI.
    #[serde(default = "default_key")]
    pub key: String,

    /// Session lifetime (e.g. "8h", "30m"). Sessions never expire when unset.
    #[serde(default)]
    pub ttl: Option<String>,

    /// Mark the session cookie `Secure`.
    #[serde(default)]
    pub secure_cookie: bool,

    /// Environment variable containing the signing key (hex-encoded).
    #[serde(default)]
    pub private_key_env: Option<String>,

    /// Path to the signing key file.
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            ttl: None,
            secure_cookie: false,
            private_key_env: None,
            private_key_file: None,
        }
    }
}

impl SessionConfig {
    /// Parse the configured lifetime.
    pub fn ttl(&self) -> Result<Option<Duration>, ConfigError> {
        self.ttl
            .as_deref()
            .map(|raw| {
                let ttl = humantime::parse_duration(raw)
                    .map_err(|e| ConfigError::Config(format!("invalid session ttl '{raw}': {e}")))?;
                if ttl > MAX_SESSION_TTL {
                    return Err(ConfigError::Config(format!(
                        "session ttl '{raw}' exceeds the maximum of {}",
                        humantime::format_duration(MAX_SESSION_TTL)
                    )));
                }
                Ok(ttl)
            })
            .transpose()
    }

    /// Resolve the signing key from environment or file.
    pub fn resolve_private_key(&self) -> Result<Option<String>, std::io::Error> {
        if let Some(env_var) = &self.private_key_env
            && let Ok(key) = std::env::var(env_var)
        {
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(path) = &self.private_key_file
            && path.exists()
        {
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim().to_string()));
        }

        Ok(None)
    }
}

fn default_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_ttl_parsing() {
        let mut config = SessionConfig::default();
        assert_eq!(config.ttl().unwrap(), None);

        config.ttl = Some("8h".into());
        assert_eq!(config.ttl().unwrap(), Some(Duration::from_secs(8 * 3600)));

        config.ttl = Some("soon".into());
        assert!(config.ttl().is_err());
    }

    #[test]
    fn test_ttl_beyond_maximum_is_rejected() {
        let mut config = SessionConfig {
            ttl: Some("100years".into()),
            ..Default::default()
        };
        assert!(config.ttl().unwrap().is_some());

        config.ttl = Some("1000000years".into());
        let err = config.ttl().unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn test_private_key_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  abcdef  ").unwrap();

        let config = SessionConfig {
            private_key_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(config.resolve_private_key().unwrap().as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_missing_key_file_resolves_to_none() {
        let config = SessionConfig {
            private_key_file: Some(PathBuf::from("/nonexistent/session.key")),
            ..Default::default()
        };
        assert!(config.resolve_private_key().unwrap().is_none());
    }
}
