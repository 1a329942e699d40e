//! The credential store.
//!
//! A fixed list of accounts checked by exact, case-sensitive username lookup
//! and Argon2 password verification. Plaintext passwords never outlive
//! construction.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use nwr_core::config::{AuthConfig, PasswordSource, UserConfig};
use nwr_core::{Identity, Role};
use std::collections::HashSet;

use crate::error::AuthError;

/// Demo accounts shipped with the dashboard: (id, username, password, role, department).
const BUILTIN_ACCOUNTS: [(&str, &str, &str, Role, Option<&str>); 3] = [
    ("1", "admin", "admin123", Role::Admin, None),
    ("2", "audit", "audit123", Role::Audit, Some("Audit Department")),
    ("3", "finance", "finance123", Role::Department, Some("Finance Department")),
];

/// One account.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string.
    password_hash: String,
    pub role: Role,
    pub department: Option<String>,
}

impl CredentialRecord {
    /// Build a record from a plaintext password.
    pub fn with_password(
        id: impl Into<String>,
        username: impl Into<String>,
        password: &str,
        role: Role,
        department: Option<String>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            id: id.into(),
            username: username.into(),
            password_hash: hash_password(password)?,
            role,
            department,
        })
    }

    /// Build a record from an existing PHC hash.
    pub fn with_hash(
        id: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        department: Option<String>,
    ) -> Result<Self, AuthError> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Self {
            id: id.into(),
            username: username.into(),
            password_hash,
            role,
            department,
        })
    }

    fn from_config(user: &UserConfig) -> Result<Self, AuthError> {
        match user.password_source() {
            Some(PasswordSource::Hash(hash)) => Self::with_hash(
                user.id.clone(),
                user.username.clone(),
                hash,
                user.role,
                user.department.clone(),
            ),
            Some(PasswordSource::Plain(password)) => Self::with_password(
                user.id.clone(),
                user.username.clone(),
                &password,
                user.role,
                user.department.clone(),
            ),
            None => Err(AuthError::MissingPassword(user.username.clone())),
        }
    }

    fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// The identity this record authenticates as.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            username: self.username.clone(),
            role: self.role,
            department: self.department.clone(),
        }
    }

    fn validate(&self) -> Result<(), AuthError> {
        let invalid = |reason: &str| AuthError::InvalidRecord {
            username: self.username.clone(),
            reason: reason.to_string(),
        };

        if self.username.is_empty() {
            return Err(invalid("username must not be empty"));
        }
        match (self.role.requires_department(), self.department.as_deref()) {
            (false, Some(_)) => Err(invalid("admin accounts carry no department")),
            (true, None) => Err(invalid("non-admin accounts need a department")),
            (true, Some(d)) if d.trim().is_empty() => Err(invalid("department must not be empty")),
            _ => Ok(()),
        }
    }
}

/// Immutable list of accounts with unique usernames.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    /// Create a store, checking username/id uniqueness and department rules.
    pub fn new(records: Vec<CredentialRecord>) -> Result<Self, AuthError> {
        let mut usernames = HashSet::new();
        let mut ids = HashSet::new();
        for record in &records {
            record.validate()?;
            if !usernames.insert(record.username.as_str()) {
                return Err(AuthError::DuplicateUsername(record.username.clone()));
            }
            if !ids.insert(record.id.as_str()) {
                return Err(AuthError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// The three demo accounts (admin, audit, finance).
    pub fn builtin() -> Result<Self, AuthError> {
        let records = BUILTIN_ACCOUNTS
            .iter()
            .map(|(id, username, password, role, department)| {
                CredentialRecord::with_password(
                    *id,
                    *username,
                    password,
                    *role,
                    department.map(String::from),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(records)
    }

    /// Configured users, or the demo accounts when none are configured.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        match &config.users {
            Some(users) => {
                let records = users
                    .iter()
                    .map(CredentialRecord::from_config)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::new(records)
            }
            None => Self::builtin(),
        }
    }

    /// Check a username/password pair.
    ///
    /// Usernames match exactly (case-sensitive). Returns the identity on success.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        self.records
            .iter()
            .find(|record| record.username == username)
            .filter(|record| record.verify_password(password))
            .map(CredentialRecord::identity)
    }

    /// Look up a record by username.
    pub fn get(&self, username: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|record| record.username == username)
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records.
    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }
}

/// Hash a password into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// Hashing is slow in debug builds; build the demo store once.
    pub(crate) fn builtin_store() -> CredentialStore {
        static STORE: OnceLock<CredentialStore> = OnceLock::new();
        STORE
            .get_or_init(|| CredentialStore::builtin().unwrap())
            .clone()
    }

    #[test]
    fn test_builtin_accounts_authenticate() {
        let store = builtin_store();
        assert_eq!(store.len(), 3);

        let admin = store.authenticate("admin", "admin123").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.department.is_none());

        let audit = store.authenticate("audit", "audit123").unwrap();
        assert_eq!(audit.role, Role::Audit);
        assert_eq!(audit.department.as_deref(), Some("Audit Department"));

        let finance = store.authenticate("finance", "finance123").unwrap();
        assert_eq!(finance.role, Role::Department);
        assert_eq!(finance.department.as_deref(), Some("Finance Department"));
    }

    #[test]
    fn test_wrong_password_and_unknown_user() {
        let store = builtin_store();
        assert!(store.authenticate("admin", "wrong").is_none());
        assert!(store.authenticate("admin", "").is_none());
        assert!(store.authenticate("nobody", "admin123").is_none());
    }

    #[test]
    fn test_username_is_case_sensitive() {
        let store = builtin_store();
        assert!(store.authenticate("Admin", "admin123").is_none());
        assert!(store.authenticate("admin ", "admin123").is_none());
    }

    #[test]
    fn test_passwords_are_not_kept_in_plaintext() {
        let store = builtin_store();
        for record in store.records() {
            assert!(record.password_hash.starts_with("$argon2"));
        }
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let hash = builtin_store().get("admin").unwrap().password_hash.clone();
        let records = vec![
            CredentialRecord::with_hash("1", "admin", hash.clone(), Role::Admin, None).unwrap(),
            CredentialRecord::with_hash("2", "admin", hash, Role::Admin, None).unwrap(),
        ];
        assert!(matches!(
            CredentialStore::new(records),
            Err(AuthError::DuplicateUsername(name)) if name == "admin"
        ));
    }

    #[test]
    fn test_department_rules() {
        let hash = builtin_store().get("admin").unwrap().password_hash.clone();

        let admin_with_department = CredentialRecord::with_hash(
            "1",
            "root",
            hash.clone(),
            Role::Admin,
            Some("IT".into()),
        )
        .unwrap();
        assert!(matches!(
            CredentialStore::new(vec![admin_with_department]),
            Err(AuthError::InvalidRecord { .. })
        ));

        let auditor_without_department =
            CredentialRecord::with_hash("2", "auditor", hash, Role::Audit, None).unwrap();
        assert!(matches!(
            CredentialStore::new(vec![auditor_without_department]),
            Err(AuthError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(matches!(
            CredentialRecord::with_hash("1", "admin", "plaintext", Role::Admin, None),
            Err(AuthError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_configured_users_replace_builtin() {
        let hash = builtin_store().get("finance").unwrap().password_hash.clone();
        let config = AuthConfig {
            login_delay_ms: 0,
            users: Some(vec![UserConfig {
                id: "10".into(),
                username: "ops".into(),
                role: Role::Department,
                department: Some("Operations".into()),
                password_hash: Some(hash),
                password_env: None,
                password: None,
            }]),
        };

        let store = CredentialStore::from_config(&config).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.authenticate("admin", "admin123").is_none());

        let ops = store.authenticate("ops", "finance123").unwrap();
        assert_eq!(ops.id, "10");
        assert_eq!(ops.department.as_deref(), Some("Operations"));
    }

    #[test]
    fn test_configured_user_without_password() {
        let config = AuthConfig {
            login_delay_ms: 0,
            users: Some(vec![UserConfig {
                id: "1".into(),
                username: "admin".into(),
                role: Role::Admin,
                department: None,
                password_hash: None,
                password_env: None,
                password: None,
            }]),
        };
        assert!(matches!(
            CredentialStore::from_config(&config),
            Err(AuthError::MissingPassword(_))
        ));
    }
}
