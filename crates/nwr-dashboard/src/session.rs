//! Cookie-backed session storage.
//!
//! The browser's cookie jar is the durable slot for the session token. A
//! [`CookieSessionStore`] is built from the request headers, records what the
//! auth service writes, and turns that into a `Set-Cookie` header for the
//! response.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use nwr_auth::{AuthError, SessionStore};

/// Cookie attributes for the session cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Cookie name (the session key).
    pub name: String,
    /// `Max-Age` in seconds; a browser-session cookie when unset.
    pub max_age: Option<i64>,
    /// Add the `Secure` attribute.
    pub secure: bool,
}

impl CookieSettings {
    fn attributes(&self) -> String {
        let mut attrs = String::from("Path=/; HttpOnly; SameSite=Lax");
        if self.secure {
            attrs.push_str("; Secure");
        }
        attrs
    }

    /// `Set-Cookie` value storing `token`.
    pub fn set(&self, token: &str) -> String {
        let mut cookie = format!("{}={}; {}", self.name, token, self.attributes());
        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        cookie
    }

    /// `Set-Cookie` value deleting the cookie.
    pub fn remove(&self) -> String {
        format!("{}=; {}; Max-Age=0", self.name, self.attributes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Set(String),
    Remove,
}

/// Session store over the request's cookie and the response's `Set-Cookie`.
#[derive(Debug, Clone)]
pub struct CookieSessionStore {
    settings: CookieSettings,
    incoming: Option<String>,
    pending: Option<Pending>,
}

impl CookieSessionStore {
    /// Read the session cookie from request headers.
    pub fn from_headers(settings: CookieSettings, headers: &HeaderMap) -> Self {
        let incoming = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookies| extract_cookie(cookies, &settings.name));

        Self {
            settings,
            incoming,
            pending: None,
        }
    }

    /// The `Set-Cookie` value for what was written, if anything.
    pub fn set_cookie(&self) -> Option<String> {
        match &self.pending {
            Some(Pending::Set(token)) => Some(self.settings.set(token)),
            Some(Pending::Remove) => Some(self.settings.remove()),
            None => None,
        }
    }

    /// Attach the pending `Set-Cookie` header to a response.
    pub fn apply(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Some(cookie) = self.set_cookie() {
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::error!(error = %e, "session cookie is not a valid header value"),
            }
        }
        response
    }
}

impl SessionStore for CookieSessionStore {
    fn load(&self) -> Option<String> {
        match &self.pending {
            Some(Pending::Set(token)) => Some(token.clone()),
            Some(Pending::Remove) => None,
            None => self.incoming.clone(),
        }
    }

    fn save(&mut self, value: &str) -> Result<(), AuthError> {
        self.pending = Some(Pending::Set(value.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AuthError> {
        self.pending = Some(Pending::Remove);
        Ok(())
    }
}

/// Extract a cookie value from a `Cookie` header.
fn extract_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}
