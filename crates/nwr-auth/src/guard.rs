//! Route protection.
//!
//! Every navigable view declares an [`Access`] requirement. The
//! [`RouteGuard`] turns that requirement and the current identity into a
//! [`GuardDecision`]. Decisions are pure and recomputed on every navigation.

use nwr_core::{Capability, Identity};

/// What a view requires of the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Only visitors without an identity (the login view).
    GuestOnly,
    /// Any authenticated identity.
    Authenticated,
    /// An authenticated identity holding the capability.
    Requires(Capability),
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested view unchanged.
    Allow,
    /// No identity: send the visitor to the login view.
    RedirectToLogin,
    /// Already authenticated: skip the login view.
    RedirectToLanding,
    /// Authenticated but lacking a capability.
    Forbidden(Capability),
}

/// Allow / redirect / forbid decisions for navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    landing_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/login", "/dashboard")
    }
}

impl RouteGuard {
    pub fn new(login_path: impl Into<String>, landing_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            landing_path: landing_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// Decide whether `identity` may see a view requiring `access`.
    pub fn check(&self, access: Access, identity: Option<&Identity>) -> GuardDecision {
        match (access, identity) {
            (Access::Public, _) => GuardDecision::Allow,
            (Access::GuestOnly, None) => GuardDecision::Allow,
            (Access::GuestOnly, Some(_)) => GuardDecision::RedirectToLanding,
            (Access::Authenticated | Access::Requires(_), None) => GuardDecision::RedirectToLogin,
            (Access::Authenticated, Some(_)) => GuardDecision::Allow,
            (Access::Requires(capability), Some(identity)) => {
                if identity.can(capability) {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Forbidden(capability)
                }
            }
        }
    }

    /// Where to go after login: `requested` when it is a local path, the
    /// landing view otherwise.
    pub fn return_path<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .filter(|path| is_local_path(path) && *path != self.login_path)
            .unwrap_or(self.landing_path.as_str())
    }
}

/// A path on this site: starts with one `/`, no scheme-relative `//` or `/\`.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(char::is_control)
}
