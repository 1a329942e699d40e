//! # nwr-auth
//!
//! Authentication for NWR Audit Central.
//!
//! - [`CredentialStore`]: the fixed list of accounts, held as Argon2 hashes
//! - [`SessionStore`]: one durable slot holding the signed session token
//! - [`AuthService`]: login, logout, restore and current-identity queries
//! - [`RouteGuard`]: the allow / redirect / forbid decision per navigation
//!
//! An [`AuthContext`] bundles the immutable pieces (credentials and signing
//! keys) and is shared by reference; each session scope (a request, a CLI
//! invocation) gets its own [`AuthService`] over its own store.

pub mod credentials;
pub mod error;
pub mod guard;
pub mod service;
pub mod store;

pub use credentials::{CredentialRecord, CredentialStore, hash_password};
pub use error::AuthError;
pub use guard::{Access, GuardDecision, RouteGuard};
pub use service::{AuthContext, AuthService};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
