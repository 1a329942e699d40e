//! Route guard middleware.
//!
//! Each protected group of routes is layered with [`require`] and the
//! [`Access`] it needs. The guard restores the request's session, asks the
//! [`RouteGuard`](nwr_auth::RouteGuard) for a decision and either forwards the
//! request with a [`CurrentUser`] extension or answers with a redirect or 403.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use nwr_auth::{Access, GuardDecision};
use nwr_core::Identity;

use crate::state::AppState;
use crate::templates;

/// The authenticated identity, inserted by the guard for handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

/// Middleware state: the app plus the access level of the guarded routes.
#[derive(Clone)]
pub struct Guarded {
    state: AppState,
    access: Access,
}

impl Guarded {
    pub fn new(state: AppState, access: Access) -> Self {
        Self { state, access }
    }
}

/// Guard middleware for a group of routes.
pub async fn require(
    State(guarded): State<Guarded>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = guarded
        .state
        .session(request.headers())
        .current_identity()
        .cloned();

    let guard = guarded.state.guard();
    match guard.check(guarded.access, identity.as_ref()) {
        GuardDecision::Allow => {
            if let Some(identity) = identity {
                request.extensions_mut().insert(CurrentUser(identity));
            }
            next.run(request).await
        }
        GuardDecision::RedirectToLogin => {
            let requested = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            tracing::debug!(path = %requested, "no session, redirecting to login");
            Redirect::to(&login_redirect(guard.login_path(), requested)).into_response()
        }
        GuardDecision::RedirectToLanding => Redirect::to(guard.landing_path()).into_response(),
        GuardDecision::Forbidden(capability) => match identity {
            Some(identity) => {
                tracing::info!(
                    username = %identity.username,
                    role = %identity.role,
                    path = %request.uri().path(),
                    "access denied"
                );
                (
                    StatusCode::FORBIDDEN,
                    Html(templates::forbidden_page(&identity, capability.denied_message())),
                )
                    .into_response()
            }
            None => StatusCode::FORBIDDEN.into_response(),
        },
    }
}

/// Login URL remembering where the visitor was headed.
pub fn login_redirect(login_path: &str, requested: &str) -> String {
    format!("{}?redirect={}", login_path, urlencoding::encode(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_target() {
        assert_eq!(
            login_redirect("/login", "/audit/hq/added-cases?x=1"),
            "/login?redirect=%2Faudit%2Fhq%2Fadded-cases%3Fx%3D1"
        );
    }
}
