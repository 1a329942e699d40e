//! # nwr-token
//!
//! Signed session tokens for NWR Audit Central.
//!
//! A session is persisted in the browser (cookie) or on disk (CLI). Whatever
//! sits in that storage slot is untrusted until verified, so the stored value
//! is a Biscuit token signed with the server's Ed25519 key:
//!
//! - [`KeyPair`] generates, loads and saves the signing key
//! - [`SessionIssuer`] turns an [`Identity`](nwr_core::Identity) into a token
//! - [`SessionVerifier`] checks the signature and expiry and recovers the claims

pub mod claims;
pub mod error;
pub mod keys;
pub mod token;

pub use biscuit_auth::PublicKey;
pub use claims::SessionClaims;
pub use error::TokenError;
pub use keys::KeyPair;
pub use token::{SessionIssuer, SessionVerifier};
