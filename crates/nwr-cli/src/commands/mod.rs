//! CLI command implementations for NWR Audit Central.

pub mod check;
pub mod keys;
pub mod serve;
pub mod session;
