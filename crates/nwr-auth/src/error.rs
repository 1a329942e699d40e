//! Error types for the auth crate.

use nwr_token::TokenError;
use thiserror::Error;

/// Errors raised while building or persisting authentication state.
///
/// Failed logins are not errors: [`AuthService::login`](crate::AuthService::login)
/// reports them as `false`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Two credential records share a username.
    #[error("duplicate username: {0}")]
    DuplicateUsername(String),

    /// Two credential records share an id.
    #[error("duplicate user id: {0}")]
    DuplicateId(String),

    /// A credential record breaks the role/department rules.
    #[error("invalid credential record '{username}': {reason}")]
    InvalidRecord { username: String, reason: String },

    /// A configured user has no password source.
    #[error("no password configured for user '{0}'")]
    MissingPassword(String),

    /// Hashing or parsing a password hash failed.
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// Session token error.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Session storage IO error.
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
}
