//! Route definitions for the dashboard.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use nwr_auth::Access;
use nwr_core::Capability;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::guard::{self, Guarded};
use crate::handlers;
use crate::state::AppState;

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    let guarded = |access: Access| {
        middleware::from_fn_with_state(Guarded::new(state.clone(), access), guard::require)
    };

    // Only the GET is guest-only; the form POST stays public.
    let public = Router::new()
        .route("/", get(handlers::root))
        .route(
            "/login",
            get(auth::login_page)
                .route_layer(guarded(Access::GuestOnly))
                .post(auth::login_submit),
        )
        .route("/logout", post(auth::logout))
        .route("/healthz", get(handlers::healthz));

    let authenticated = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/para/{id}", get(handlers::para_history))
        .route("/para/{id}/details", get(handlers::para_details))
        .route("/audit/{unit}/{metric}", get(handlers::audit_breakdown))
        .route_layer(guarded(Access::Authenticated));

    let reminders = Router::new()
        .route("/emails", get(handlers::emails))
        .route_layer(guarded(Access::Requires(Capability::SendReminders)));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(reminders)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode, header};
    use nwr_auth::AuthContext;
    use nwr_core::AppConfig;
    use nwr_token::{KeyPair, SessionIssuer};
    use std::sync::OnceLock;
    use tower::ServiceExt;

    /// Password hashing is slow in debug builds; share one state.
    fn state() -> AppState {
        static STATE: OnceLock<AppState> = OnceLock::new();
        STATE
            .get_or_init(|| AppState::from_config(AppConfig::default()).unwrap())
            .clone()
    }

    async fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        create_router(state())
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(uri: &str, form: &str) -> Response<Body> {
        create_router(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    fn set_cookie(response: &Response<Body>) -> Option<&str> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap())
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Log in and return the `name=value` pair to send back as `Cookie`.
    async fn login(username: &str, password: &str) -> String {
        let response = post_form("/login", &format!("username={username}&password={password}")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = set_cookie(&response).expect("login sets the session cookie");
        cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = get_with_cookie("/healthz", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_redirects_to_login() {
        let response = get_with_cookie("/", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_protected_view_without_session_redirects() {
        let response = get_with_cookie("/para/12/details", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?redirect=%2Fpara%2F12%2Fdetails");
    }

    #[tokio::test]
    async fn test_login_then_dashboard() {
        let cookie = login("admin", "admin123").await;
        assert!(cookie.starts_with("nwr_audit_user="));

        let response = get_with_cookie("/dashboard", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("admin"));
        assert!(body.contains("All Units"));
        assert!(!body.contains("Upload Document"));
    }

    #[tokio::test]
    async fn test_successful_login_redirects_to_landing() {
        let response = post_form("/login", "username=finance&password=finance123").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        assert!(set_cookie(&response).unwrap().contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_failed_login_redirects_with_error() {
        let response = post_form("/login", "username=admin&password=wrong").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?error=invalid");
        assert!(set_cookie(&response).is_none());

        let page = get_with_cookie("/login?error=invalid", None).await;
        assert_eq!(page.status(), StatusCode::OK);
        assert!(body_text(page).await.contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_redirect_target() {
        let response =
            post_form("/login", "username=audit&password=nope&redirect=%2Femails").await;
        assert_eq!(location(&response), "/login?error=invalid&redirect=%2Femails");
    }

    #[tokio::test]
    async fn test_login_honors_local_redirect_only() {
        let response = post_form(
            "/login",
            "username=audit&password=audit123&redirect=%2Fpara%2F7",
        )
        .await;
        assert_eq!(location(&response), "/para/7");

        let response = post_form(
            "/login",
            "username=audit&password=audit123&redirect=https%3A%2F%2Fevil.example",
        )
        .await;
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_login_page_with_session_redirects_away() {
        let cookie = login("finance", "finance123").await;
        let response = get_with_cookie("/login", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
    }

    #[tokio::test]
    async fn test_emails_restricted_to_audit() {
        let finance = login("finance", "finance123").await;
        let response = get_with_cookie("/emails", Some(&finance)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("Access restricted to Audit Department only."));

        let admin = login("admin", "admin123").await;
        let response = get_with_cookie("/emails", Some(&admin)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let audit = login("audit", "audit123").await;
        let response = get_with_cookie("/emails", Some(&audit)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Email Reminders"));
    }

    #[tokio::test]
    async fn test_audit_sees_para_actions() {
        let audit = login("audit", "audit123").await;
        let response = get_with_cookie("/para/3/details", Some(&audit)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Edit Para"));
        assert!(body.contains("Audit Department"));
    }

    #[tokio::test]
    async fn test_forged_cookie_is_ignored() {
        let forged = r#"nwr_audit_user={"id":"1","username":"admin","role":"admin"}"#;
        let response = get_with_cookie("/dashboard", Some(forged)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login?redirect=%2Fdashboard");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let cookie = login("admin", "admin123").await;
        let response = create_router(state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_audit_breakdown_routes() {
        let cookie = login("admin", "admin123").await;

        let response = get_with_cookie("/audit/hq/added-cases", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Headquarters - Added Cases"));

        let response = get_with_cookie("/audit/mars/added-cases", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = get_with_cookie("/nowhere", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Oops! Page not found"));
    }

    #[tokio::test]
    async fn test_logout_requires_post() {
        let cookie = login("admin", "admin123").await;
        let response = get_with_cookie("/logout", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(set_cookie(&response).is_none());

        let response = get_with_cookie("/dashboard", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_has_no_para_actions() {
        let audit = login("audit", "audit123").await;
        let response = get_with_cookie("/dashboard", Some(&audit)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Select a para to view details"));
        assert!(!body.contains("Edit Para"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_delay_is_applied() {
        let mut config = AppConfig::default();
        config.auth.login_delay_ms = 1500;
        let credentials = state().auth().credentials().clone();
        let issuer = SessionIssuer::new(KeyPair::generate().unwrap());
        let delayed = AppState::new(config, AuthContext::new(credentials, issuer)).unwrap();

        let started = tokio::time::Instant::now();
        let response = create_router(delayed)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=admin&password=wrong"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(started.elapsed() >= std::time::Duration::from_millis(1500));
    }
}
