//! Configuration types for NWR Audit Central.
//!
//! Configuration is read from a single YAML file (`nwr-audit.yaml` by
//! default). Every section has defaults, so a missing file yields a working
//! configuration with the built-in demo accounts.

pub mod auth;
pub mod dashboard;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use auth::{AuthConfig, PasswordSource, UserConfig};
pub use dashboard::DashboardConfig;
pub use session::{DEFAULT_SESSION_KEY, MAX_SESSION_TTL, SessionConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "nwr-audit.yaml";

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dashboard listener settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Session persistence and signing.
    #[serde(default)]
    pub session: SessionConfig,

    /// Credentials.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Directory for CLI state (session file, generated keys).
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig::default(),
            session: SessionConfig::default(),
            auth: AuthConfig::default(),
            state_dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".nwr-audit")
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// Relative key-file and state paths are resolved against the config
    /// file's directory.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let mut config = Self::from_file(path)?;
        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(key_file) = &config.session.private_key_file
            && key_file.is_relative()
        {
            config.session.private_key_file = Some(base_dir.join(key_file));
        }
        if config.state_dir.is_relative() {
            config.state_dir = base_dir.join(&config.state_dir);
        }

        Ok(config)
    }

    /// Check settings that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.ttl()?;

        if self.session.key.trim().is_empty() {
            return Err(ConfigError::Config("session key must not be empty".into()));
        }

        if let Some(users) = &self.auth.users {
            if users.is_empty() {
                return Err(ConfigError::Config(
                    "auth.users is present but empty; remove it to use the built-in accounts".into(),
                ));
            }
            for user in users {
                if user.password_source().is_none() {
                    return Err(ConfigError::Config(format!(
                        "user '{}' has no password, password_env or password_hash",
                        user.username
                    )));
                }
            }
        }

        Ok(())
    }

    /// Path of the CLI session file.
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join(&self.session.key)
    }

    /// Path of the key generated by the CLI when none is configured.
    pub fn generated_key_file(&self) -> PathBuf {
        self.state_dir.join("session.key")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.session.key, DEFAULT_SESSION_KEY);
        assert!(config.auth.users.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
dashboard:
  host: 0.0.0.0
  port: 9000
session:
  key: audit_session
  ttl: 30m
  secure_cookie: true
auth:
  login_delay_ms: 250
  users:
    - id: "7"
      username: ops
      role: department
      department: Operations
      password: ops-pass
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.dashboard.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.session.key, "audit_session");
        assert!(config.session.secure_cookie);
        assert_eq!(config.auth.login_delay_ms, 250);

        let users = config.auth.users.as_ref().unwrap();
        assert_eq!(users[0].role, Role::Department);
        assert_eq!(users[0].department.as_deref(), Some("Operations"));
        config.validate().unwrap();
    }

    #[test]
    fn test_huge_ttl_fails_validation() {
        let config = AppConfig::from_yaml("session:\n  ttl: 1000000years\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_user_without_password_is_rejected() {
        let yaml = r#"
auth:
  users:
    - id: "1"
      username: admin
      role: admin
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        let yaml = r#"
auth:
  users:
    - id: "1"
      username: root
      role: superuser
      password: x
"#;
        assert!(matches!(AppConfig::from_yaml(yaml), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.session_file(), PathBuf::from(".nwr-audit/nwr_audit_user"));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "session:\n  private_key_file: keys/session.key\nstate_dir: state\n",
        )
        .unwrap();

        let config = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(
            config.session.private_key_file,
            Some(dir.path().join("keys/session.key"))
        );
        assert_eq!(config.state_dir, dir.path().join("state"));
    }
}
