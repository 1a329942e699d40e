//! # nwr-dashboard
//!
//! Web dashboard for NWR Audit Central.
//!
//! Server-rendered pages behind a cookie session:
//! - Login / logout
//! - Overview dashboard
//! - Para history and para details
//! - Audit breakdown per unit and metric
//! - Reminder-email panel (audit department only)
//!
//! ## Tech Stack
//!
//! - Axum for HTTP server
//! - Route protection as an axum middleware per access level
//! - Signed session tokens in an `HttpOnly` cookie
//! - Tailwind CSS from CDN for styling

pub mod auth;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod templates;

pub use error::DashboardError;
pub use server::DashboardServer;
pub use state::AppState;
