//! Request handlers for the dashboard.

use axum::{
    Extension, Json,
    extract::Path,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::error::DashboardError;
use crate::guard::CurrentUser;
use crate::pages::{self, AuditMetric, AuditUnit};
use crate::templates;

// =============================================================================
// Page Handlers (HTML responses)
// =============================================================================

/// `/` sends everyone to the login view, which forwards signed-in users on.
pub async fn root() -> Redirect {
    Redirect::to("/login")
}

/// Handler for the overview dashboard.
pub async fn dashboard(Extension(CurrentUser(identity)): Extension<CurrentUser>) -> Html<String> {
    Html(pages::dashboard_page(&identity))
}

/// Handler for the para history page.
pub async fn para_history(
    Extension(CurrentUser(identity)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Html<String> {
    Html(pages::para_history_page(&identity, &id))
}

/// Handler for the para details page.
pub async fn para_details(
    Extension(CurrentUser(identity)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Html<String> {
    Html(pages::para_details_page(&identity, &id))
}

/// Handler for the audit breakdown page.
pub async fn audit_breakdown(
    Extension(CurrentUser(identity)): Extension<CurrentUser>,
    Path((unit, metric)): Path<(String, String)>,
) -> Result<Html<String>, DashboardError> {
    let unit = unit
        .parse::<AuditUnit>()
        .map_err(|_| DashboardError::NotFound(format!("Unknown audit unit '{unit}'")))?;
    let metric = metric
        .parse::<AuditMetric>()
        .map_err(|_| DashboardError::NotFound(format!("Unknown audit metric '{metric}'")))?;

    Ok(Html(pages::audit_breakdown_page(&identity, unit, metric)))
}

/// Handler for the reminder-email panel. Guarded by capability.
pub async fn emails(Extension(CurrentUser(identity)): Extension<CurrentUser>) -> Html<String> {
    Html(pages::emails_page(&identity))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "route not found");
    (
        StatusCode::NOT_FOUND,
        Html(templates::not_found_page("Oops! Page not found")),
    )
        .into_response()
}

// =============================================================================
// API Handlers (JSON responses)
// =============================================================================

/// Liveness probe.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "nwr-audit" }))
}
