//! `nwr-audit check-config` command implementation.
//!
//! Loads the configuration and runs every check the dashboard runs at
//! startup: TTL syntax, password sources, unique usernames and ids, the
//! department rules per role, and the signing key.

use anyhow::Context;
use nwr_auth::CredentialStore;
use nwr_core::AppConfig;
use nwr_token::KeyPair;
use std::path::Path;

/// Validate the configuration at `path` and print a summary.
pub fn run(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("{} not found; using built-in defaults", path.display());
    }
    let config = AppConfig::load_or_default(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    let summary = check(&config)?;
    for line in summary {
        println!("  {line}");
    }
    println!("✔ Configuration is valid");
    Ok(())
}

/// Run all checks, returning human-readable findings.
pub fn check(config: &AppConfig) -> anyhow::Result<Vec<String>> {
    config.validate()?;
    let credentials = CredentialStore::from_config(&config.auth)?;

    let mut summary = vec![
        format!("dashboard: {}", config.dashboard.bind_address()),
        format!(
            "users: {} ({})",
            credentials.len(),
            if config.auth.users.is_some() { "configured" } else { "built-in" }
        ),
        format!("session key: {}", config.session.key),
        format!("session ttl: {}", config.session.ttl.as_deref().unwrap_or("none")),
    ];

    match config
        .session
        .resolve_private_key()
        .context("Failed to read session signing key")?
    {
        Some(hex) => {
            let keypair = KeyPair::from_private_key_hex(&hex).context("Invalid session signing key")?;
            summary.push(format!("signing key: configured (public {})", keypair.public_key_hex()));
        }
        None => summary.push("signing key: none (dashboard sessions end on restart)".to_string()),
    }

    Ok(summary)
}
