//! Error types for the dashboard crate.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use nwr_auth::AuthError;
use nwr_core::ConfigError;
use nwr_token::TokenError;
use thiserror::Error;

use crate::templates;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to start the server.
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Credential store or session storage error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Signing key error.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        match self {
            DashboardError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Html(templates::not_found_page(&what))).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}
