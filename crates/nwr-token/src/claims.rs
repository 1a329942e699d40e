//! Claims carried by a session token.

use chrono::{DateTime, Duration, Utc};
use nwr_core::{Identity, Role};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Everything a session token asserts about its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Credential record id.
    pub user_id: String,

    pub username: String,

    pub role: Role,

    /// Absent for admins.
    #[serde(default)]
    pub department: Option<String>,

    /// When the session was issued.
    pub issued_at: DateTime<Utc>,

    /// When the session stops being accepted, if ever.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionClaims {
    /// Build claims for an identity, issued now.
    ///
    /// Fails when `ttl` puts the expiry beyond the representable range.
    pub fn for_identity(identity: &Identity, ttl: Option<Duration>) -> Result<Self, TokenError> {
        let issued_at = truncate_to_seconds(Utc::now());
        let expires_at = ttl
            .map(|ttl| {
                issued_at
                    .checked_add_signed(ttl)
                    .ok_or_else(|| TokenError::InvalidClaim {
                        claim: "expires_at".to_string(),
                        reason: format!("session lifetime of {}s is out of range", ttl.num_seconds()),
                    })
            })
            .transpose()?;

        Ok(Self {
            user_id: identity.id.clone(),
            username: identity.username.clone(),
            role: identity.role,
            department: identity.department.clone(),
            issued_at,
            expires_at,
        })
    }

    /// The identity these claims describe.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.user_id.clone(),
            username: self.username.clone(),
            role: self.role,
            department: self.department.clone(),
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Time left before expiry.
    pub fn time_until_expiration(&self) -> Option<Duration> {
        self.expires_at.map(|exp| exp - Utc::now())
    }
}

/// Token timestamps have second precision.
fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(at.timestamp(), 0).unwrap_or(at)
}
