//! Dashboard application state.

use axum::http::HeaderMap;
use nwr_auth::{AuthContext, AuthService, CredentialStore, RouteGuard};
use nwr_core::AppConfig;
use nwr_token::{KeyPair, SessionIssuer};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DashboardError;
use crate::session::{CookieSessionStore, CookieSettings};

/// Shared application state for the dashboard.
///
/// Immutable after startup. Identity is never stored here: every request
/// restores its own [`AuthService`] from its cookie.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    auth: AuthContext,
    guard: RouteGuard,
    cookie: CookieSettings,
}

impl AppState {
    /// Create state from a prepared auth context.
    pub fn new(config: AppConfig, auth: AuthContext) -> Result<Self, DashboardError> {
        let cookie = CookieSettings {
            name: config.session.key.clone(),
            max_age: config
                .session
                .ttl()?
                .map(|ttl| i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            secure: config.session.secure_cookie,
        };

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                guard: RouteGuard::default(),
                cookie,
            }),
        })
    }

    /// Build credentials and signing keys from configuration.
    ///
    /// Without a configured key an ephemeral one is generated, so sessions
    /// end when the process restarts.
    pub fn from_config(config: AppConfig) -> Result<Self, DashboardError> {
        config.validate()?;

        let credentials = CredentialStore::from_config(&config.auth)?;
        let keypair = match config.session.resolve_private_key().map_err(nwr_core::ConfigError::from)? {
            Some(hex) => KeyPair::from_private_key_hex(&hex)?,
            None => {
                tracing::warn!("no session signing key configured; sessions will not survive a restart");
                KeyPair::generate()?
            }
        };
        let issuer = SessionIssuer::new(keypair).with_ttl(chrono_ttl(config.session.ttl()?)?);

        tracing::info!(users = credentials.len(), "credential store loaded");
        Self::new(config, AuthContext::new(credentials, issuer))
    }

    /// Get the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the shared auth context.
    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    /// Get the route guard.
    pub fn guard(&self) -> &RouteGuard {
        &self.inner.guard
    }

    /// Get the session cookie settings.
    pub fn cookie(&self) -> &CookieSettings {
        &self.inner.cookie
    }

    /// Restore the auth service for a request.
    pub fn session(&self, headers: &HeaderMap) -> AuthService<CookieSessionStore> {
        self.inner
            .auth
            .restore(CookieSessionStore::from_headers(self.inner.cookie.clone(), headers))
    }

    /// Artificial delay before answering a login attempt.
    pub fn login_delay(&self) -> Option<Duration> {
        match self.inner.config.auth.login_delay_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

fn chrono_ttl(ttl: Option<Duration>) -> Result<Option<chrono::Duration>, DashboardError> {
    ttl.map(|ttl| {
        chrono::Duration::from_std(ttl).map_err(|e| {
            DashboardError::Config(nwr_core::ConfigError::Config(format!(
                "session ttl out of range: {e}"
            )))
        })
    })
    .transpose()
}
