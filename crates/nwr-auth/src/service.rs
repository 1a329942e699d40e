//! The auth service.
//!
//! [`AuthService`] owns the identity of one session scope. It is the only
//! writer to its [`SessionStore`]: login writes a signed token, logout removes
//! it, and construction restores whatever valid token the store holds.

use nwr_core::Identity;
use nwr_token::{SessionIssuer, SessionVerifier};
use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::error::AuthError;
use crate::store::SessionStore;

/// Immutable authentication state shared by every session scope.
#[derive(Debug, Clone)]
pub struct AuthContext {
    inner: Arc<AuthContextInner>,
}

#[derive(Debug)]
struct AuthContextInner {
    credentials: CredentialStore,
    issuer: SessionIssuer,
    verifier: SessionVerifier,
}

impl AuthContext {
    /// Bundle a credential store with the session signing key.
    pub fn new(credentials: CredentialStore, issuer: SessionIssuer) -> Self {
        let verifier = issuer.verifier();
        Self {
            inner: Arc::new(AuthContextInner {
                credentials,
                issuer,
                verifier,
            }),
        }
    }

    /// The credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// The session token issuer.
    pub fn issuer(&self) -> &SessionIssuer {
        &self.inner.issuer
    }

    /// Start a session scope over `store`, restoring any valid stored session.
    pub fn restore<S: SessionStore>(&self, store: S) -> AuthService<S> {
        AuthService::restore(self.clone(), store)
    }

    /// Decode a stored session value. Anything unverifiable is `None`.
    pub fn identity_from_token(&self, token: &str) -> Option<Identity> {
        match self.inner.verifier.verify(token) {
            Ok(claims) => Some(claims.identity()),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid stored session");
                None
            }
        }
    }
}

/// Login, logout and current identity for one session scope.
#[derive(Debug)]
pub struct AuthService<S: SessionStore> {
    context: AuthContext,
    store: S,
    identity: Option<Identity>,
}

impl<S: SessionStore> AuthService<S> {
    /// Create the service, taking the identity from the store when it holds
    /// a valid session. Corrupt, foreign-signed or expired content is treated
    /// as no session.
    pub fn restore(context: AuthContext, store: S) -> Self {
        let identity = store
            .load()
            .and_then(|token| context.identity_from_token(&token));

        if let Some(identity) = &identity {
            tracing::debug!(username = %identity.username, role = %identity.role, "session restored");
        }

        Self {
            context,
            store,
            identity,
        }
    }

    /// Check credentials and, on success, make them the current identity.
    ///
    /// A failed attempt leaves the current identity and the store untouched.
    /// A successful attempt replaces any previous identity. When the session
    /// cannot be stored the login still holds for this scope; use
    /// [`login_persisted`](Self::login_persisted) to treat that as an error.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let Some(identity) = self.authenticate(username, password) else {
            return false;
        };

        if let Err(e) = self.persist(&identity) {
            tracing::error!(error = %e, "failed to persist session; it will not survive a restart");
        }
        self.accept(identity);
        true
    }

    /// Like [`login`](Self::login), but a session that cannot be stored is an
    /// error and leaves the current identity unchanged.
    pub fn login_persisted(&mut self, username: &str, password: &str) -> Result<bool, AuthError> {
        let Some(identity) = self.authenticate(username, password) else {
            return Ok(false);
        };

        self.persist(&identity)?;
        self.accept(identity);
        Ok(true)
    }

    fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        let identity = self.context.credentials().authenticate(username, password);
        if identity.is_none() {
            tracing::warn!(username = %username, "login failed: invalid username or password");
        }
        identity
    }

    fn persist(&mut self, identity: &Identity) -> Result<(), AuthError> {
        let token = self.context.issuer().issue(identity)?;
        self.store.save(&token)
    }

    fn accept(&mut self, identity: Identity) {
        tracing::info!(
            username = %identity.username,
            role = %identity.role,
            department = identity.department.as_deref().unwrap_or("-"),
            "login succeeded"
        );
        self.identity = Some(identity);
    }

    /// Forget the current identity and remove the stored session.
    pub fn logout(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!(username = %identity.username, "logged out");
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to remove stored session");
        }
    }

    /// The current identity, if any.
    pub fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Whether an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store, ending the session scope.
    pub fn into_store(self) -> S {
        self.store
    }
}
