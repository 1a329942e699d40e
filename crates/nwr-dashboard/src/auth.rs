//! Login and logout.
//!
//! The login form posts credentials to [`login_submit`], which runs the
//! request's [`AuthService`](nwr_auth::AuthService) and answers with a
//! redirect carrying the session cookie.

use axum::{
    Form,
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::state::AppState;
use crate::templates::{bare_layout, html_escape};

/// Message shown after a failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login page query parameters
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Handler for the login page (GET). Guarded as guest-only.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(login_page_template(query.redirect.as_deref(), query.error.is_some()))
}

/// Handler for login form submission (POST)
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Some(delay) = state.login_delay() {
        tokio::time::sleep(delay).await;
    }

    let mut session = state.session(&headers);
    if session.login(&form.username, &form.password) {
        let target = state
            .guard()
            .return_path(form.redirect.as_deref().filter(|r| !r.is_empty()))
            .to_string();
        return session.into_store().apply(Redirect::to(&target));
    }

    let redirect = form
        .redirect
        .filter(|r| !r.is_empty())
        .map(|r| format!("&redirect={}", urlencoding::encode(&r)))
        .unwrap_or_default();
    Redirect::to(&format!("{}?error=invalid{}", state.guard().login_path(), redirect)).into_response()
}

/// Handler for logout (POST only)
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut session = state.session(&headers);
    session.logout();
    session
        .into_store()
        .apply(Redirect::to(state.guard().login_path()))
}

/// Generate the login page HTML
fn login_page_template(redirect: Option<&str>, failed: bool) -> String {
    let error_html = if failed {
        format!(
            r##"<div class="mb-6 p-4 bg-red-50 border border-red-200 rounded-lg">
            <div class="flex items-center gap-3">
                <i class="fas fa-shield-alt text-red-600"></i>
                <span class="text-red-600">{INVALID_CREDENTIALS}</span>
            </div>
        </div>"##
        )
    } else {
        String::new()
    };

    let redirect_input = redirect
        .map(|r| format!(r#"<input type="hidden" name="redirect" value="{}">"#, html_escape(r)))
        .unwrap_or_default();

    let content = format!(
        r##"<div class="w-full max-w-md bg-white rounded-lg shadow-xl">
        <div class="text-center p-8 pb-6">
            <div class="flex justify-center mb-4">
                <div class="bg-blue-600 p-3 rounded-full text-white"><i class="fas fa-building text-2xl"></i></div>
            </div>
            <h1 class="text-2xl font-bold text-gray-800">NWR Audit Central</h1>
            <p class="text-gray-600 mt-2">Website Audit Management System</p>
        </div>

        <div class="px-8 pb-8">
            {error_html}

            <form method="POST" action="/login" class="space-y-6">
                {redirect_input}

                <div class="space-y-2">
                    <label for="username" class="text-sm font-medium">Username</label>
                    <input type="text" id="username" name="username" required autofocus
                        class="block w-full h-11 px-3 border border-gray-300 rounded-md"
                        placeholder="Enter your username">
                </div>

                <div class="space-y-2">
                    <label for="password" class="text-sm font-medium">Password</label>
                    <input type="password" id="password" name="password" required
                        class="block w-full h-11 px-3 border border-gray-300 rounded-md"
                        placeholder="Enter your password">
                </div>

                <button type="submit" class="w-full h-11 bg-blue-600 hover:bg-blue-700 text-white rounded-md">
                    Sign In
                </button>
            </form>
        </div>
    </div>"##
    );

    bare_layout("Login", &content)
}
