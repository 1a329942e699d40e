//! Session token issuing and verification.

use crate::claims::SessionClaims;
use crate::error::TokenError;
use crate::keys::KeyPair;
use biscuit_auth::builder::{AuthorizerBuilder, Rule};
use biscuit_auth::macros::{check, fact};
use biscuit_auth::{Authorizer, Biscuit, PublicKey};
use chrono::{DateTime, Duration, Utc};
use nwr_core::{Identity, Role};

/// Mints signed session tokens.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    keypair: KeyPair,
    ttl: Option<Duration>,
}

impl SessionIssuer {
    /// Create an issuer whose sessions never expire.
    pub fn new(keypair: KeyPair) -> Self {
        Self { keypair, ttl: None }
    }

    /// Limit the lifetime of issued sessions.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// The configured lifetime.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// The verifier matching this issuer's key.
    pub fn verifier(&self) -> SessionVerifier {
        SessionVerifier::new(self.keypair.public_key())
    }

    /// Issue a token for an identity.
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_claims(&SessionClaims::for_identity(identity, self.ttl)?)
    }

    /// Issue a token asserting exactly these claims.
    pub fn issue_claims(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        let mut builder = Biscuit::builder()
            .fact(fact!("user({id})", id = claims.user_id.clone()))
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?
            .fact(fact!("username({name})", name = claims.username.clone()))
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?
            .fact(fact!("role({role})", role = claims.role.as_str().to_string()))
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?
            .fact(fact!(
                "issued_at({timestamp})",
                timestamp = claims.issued_at.timestamp()
            ))
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?;

        if let Some(department) = &claims.department {
            builder = builder
                .fact(fact!("department({department})", department = department.clone()))
                .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?;
        }

        if let Some(expires_at) = claims.expires_at {
            let expires_at = expires_at.timestamp();
            builder = builder
                .fact(fact!("expires_at({expires_at})", expires_at = expires_at))
                .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?
                .check(check!(
                    "check if time($time), $time < {expires_at}",
                    expires_at = expires_at
                ))
                .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?;
        }

        let biscuit = builder
            .build(self.keypair.inner())
            .map_err(|e| TokenError::TokenCreationFailed(e.to_string()))?;

        biscuit
            .to_base64()
            .map_err(|e| TokenError::SerializationError(e.to_string()))
    }
}

/// Verifies session tokens against the signing public key.
#[derive(Debug, Clone)]
pub struct SessionVerifier {
    public_key: PublicKey,
}

impl SessionVerifier {
    /// Create a new verifier with the given public key.
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Verify a token and extract its claims.
    ///
    /// Fails on bad encoding, a signature from another key, an expired
    /// session or missing claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let biscuit = Biscuit::from_base64(token.trim(), self.public_key.clone())
            .map_err(|e| TokenError::TokenParseFailed(e.to_string()))?;

        let now = Utc::now().timestamp();
        let mut authorizer = AuthorizerBuilder::new()
            .code(format!(
                r#"
                time({now});
                allow if user($u);
                "#
            ))
            .map_err(|e| TokenError::VerificationFailed(e.to_string()))?
            .build(&biscuit)
            .map_err(|e| TokenError::VerificationFailed(e.to_string()))?;

        authorizer
            .authorize()
            .map_err(|e| TokenError::VerificationFailed(e.to_string()))?;

        let user_id = required(query_string(&mut authorizer, "user")?, "user")?;
        let username = required(query_string(&mut authorizer, "username")?, "username")?;
        let role_name = required(query_string(&mut authorizer, "role")?, "role")?;
        let role = role_name
            .parse::<Role>()
            .map_err(|e| TokenError::InvalidClaim {
                claim: "role".into(),
                reason: e.to_string(),
            })?;
        let department = query_string(&mut authorizer, "department")?;
        let issued_at = timestamp(
            required(query_i64(&mut authorizer, "issued_at")?, "issued_at")?,
            "issued_at",
        )?;
        let expires_at = query_i64(&mut authorizer, "expires_at")?
            .map(|ts| timestamp(ts, "expires_at"))
            .transpose()?;

        Ok(SessionClaims {
            user_id,
            username,
            role,
            department,
            issued_at,
            expires_at,
        })
    }
}

fn fact_rule(name: &str) -> Result<Rule, TokenError> {
    format!("data($x) <- {name}($x)")
        .parse()
        .map_err(|e: biscuit_auth::error::Token| TokenError::VerificationFailed(e.to_string()))
}

fn query_string(authorizer: &mut Authorizer, name: &str) -> Result<Option<String>, TokenError> {
    let results: Vec<(String,)> = authorizer
        .query(fact_rule(name)?)
        .map_err(|e| TokenError::VerificationFailed(e.to_string()))?;
    Ok(results.into_iter().next().map(|(s,)| s))
}

fn query_i64(authorizer: &mut Authorizer, name: &str) -> Result<Option<i64>, TokenError> {
    let results: Vec<(i64,)> = authorizer
        .query(fact_rule(name)?)
        .map_err(|e| TokenError::VerificationFailed(e.to_string()))?;
    Ok(results.into_iter().next().map(|(n,)| n))
}

fn required<T>(value: Option<T>, claim: &str) -> Result<T, TokenError> {
    value.ok_or_else(|| TokenError::MissingClaim {
        claim: claim.to_string(),
    })
}

fn timestamp(seconds: i64, claim: &str) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| TokenError::InvalidClaim {
        claim: claim.to_string(),
        reason: format!("timestamp {seconds} out of range"),
    })
}
