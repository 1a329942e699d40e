//! # nwr-core
//!
//! Shared types for NWR Audit Central: the authenticated [`Identity`], the
//! [`Role`] and [`Capability`] model, and the YAML [`AppConfig`].

pub mod config;
pub mod identity;

pub use config::{AppConfig, AuthConfig, ConfigError, DashboardConfig, SessionConfig, UserConfig};
pub use identity::{Capability, Identity, Role, UnknownRole};
