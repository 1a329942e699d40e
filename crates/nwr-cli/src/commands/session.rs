//! Session commands.
//!
//! `nwr-audit login` - Check credentials and store a signed session.
//! `nwr-audit logout` - Remove the stored session.
//! `nwr-audit whoami` - Show the identity of the stored session.
//!
//! The session lives in `<state_dir>/<session.key>`. Without a configured
//! signing key, `login` generates one at `<state_dir>/session.key` so later
//! invocations can verify the session.

use anyhow::Context;
use nwr_auth::{AuthContext, AuthService, CredentialStore, FileSessionStore};
use nwr_core::{AppConfig, Identity};
use nwr_token::{KeyPair, SessionIssuer};

/// Printed when credentials are rejected.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Log in with `username` and `password`.
pub fn login(config: &AppConfig, username: &str, password: &str) -> anyhow::Result<Identity> {
    let mut service = open(config, true)?;
    let accepted = service.login_persisted(username, password).with_context(|| {
        format!("Failed to store the session at {}", config.session_file().display())
    })?;
    if !accepted {
        anyhow::bail!(INVALID_CREDENTIALS);
    }
    tracing::info!(session = %config.session_file().display(), "session stored");
    service
        .current_identity()
        .cloned()
        .context("login succeeded without an identity")
}

/// Remove the stored session.
pub fn logout(config: &AppConfig) -> anyhow::Result<()> {
    open(config, false)?.logout();
    tracing::info!(session = %config.session_file().display(), "session removed");
    Ok(())
}

/// Identity of the stored session, if it is valid.
pub fn whoami(config: &AppConfig) -> anyhow::Result<Option<Identity>> {
    Ok(open(config, false)?.current_identity().cloned())
}

/// One-line summary of an identity.
pub fn describe(identity: &Identity) -> String {
    format!(
        "{} (id {}, role {}, {})",
        identity.username,
        identity.id,
        identity.role,
        identity.department_label()
    )
}

fn open(config: &AppConfig, create_key: bool) -> anyhow::Result<AuthService<FileSessionStore>> {
    config.validate()?;

    let credentials = CredentialStore::from_config(&config.auth)?;
    let ttl = config
        .session
        .ttl()?
        .map(chrono::Duration::from_std)
        .transpose()
        .context("session ttl out of range")?;
    let issuer = SessionIssuer::new(signing_key(config, create_key)?).with_ttl(ttl);

    let context = AuthContext::new(credentials, issuer);
    Ok(context.restore(FileSessionStore::new(config.session_file())))
}

/// The configured key, else the generated one.
///
/// When nothing exists yet and `create` is false, a throwaway key is used:
/// no stored session can verify against it, which is the right answer.
fn signing_key(config: &AppConfig, create: bool) -> anyhow::Result<KeyPair> {
    if let Some(hex) = config
        .session
        .resolve_private_key()
        .context("Failed to read session signing key")?
    {
        return KeyPair::from_private_key_hex(&hex).context("Invalid session signing key");
    }

    let path = config.generated_key_file();
    let keypair = if create {
        KeyPair::load_or_generate(&path)?
    } else if path.exists() {
        KeyPair::load_from_file(&path)?
    } else {
        KeyPair::generate()?
    };
    Ok(keypair)
}
