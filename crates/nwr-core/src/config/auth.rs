//! Credential configuration.
//!
//! When `users` is omitted the built-in demo accounts are used.

use serde::{Deserialize, Serialize};

use crate::identity::Role;

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Artificial delay applied to dashboard logins, in milliseconds.
    #[serde(default)]
    pub login_delay_ms: u64,

    /// Users replacing the built-in accounts.
    #[serde(default)]
    pub users: Option<Vec<UserConfig>>,
}

/// A configured dashboard user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,

    /// Argon2 PHC string.
    #[serde(default)]
    pub password_hash: Option<String>,

    /// Environment variable containing the plaintext password.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Plaintext password. Hashed at load time.
    #[serde(default)]
    pub password: Option<String>,
}

/// Where a user's password comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// Already hashed (PHC string).
    Hash(String),
    /// Plaintext that still needs hashing.
    Plain(String),
}

impl UserConfig {
    /// Resolve the password, preferring a hash, then the env var, then plaintext.
    pub fn password_source(&self) -> Option<PasswordSource> {
        if let Some(hash) = &self.password_hash {
            return Some(PasswordSource::Hash(hash.clone()));
        }
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(PasswordSource::Plain(password));
        }
        self.password.clone().map(PasswordSource::Plain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserConfig {
        UserConfig {
            id: "9".into(),
            username: "auditor".into(),
            role: Role::Audit,
            department: Some("Audit Department".into()),
            password_hash: None,
            password_env: None,
            password: None,
        }
    }

    #[test]
    fn test_hash_takes_precedence() {
        let mut u = user();
        u.password = Some("plain".into());
        u.password_hash = Some("$argon2id$v=19$stub".into());
        assert_eq!(
            u.password_source(),
            Some(PasswordSource::Hash("$argon2id$v=19$stub".into()))
        );
    }

    #[test]
    fn test_unset_env_falls_back_to_plaintext() {
        let mut u = user();
        u.password_env = Some("NWR_AUDIT_TEST_UNSET_PASSWORD_VAR".into());
        u.password = Some("plain".into());
        assert_eq!(u.password_source(), Some(PasswordSource::Plain("plain".into())));
    }

    #[test]
    fn test_no_source() {
        assert_eq!(user().password_source(), None);
    }
}
