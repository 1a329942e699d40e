//! Identity, roles and capabilities.
//!
//! An [`Identity`] is what the rest of the system knows about an authenticated
//! user. It never carries a password. Role-based access is expressed through
//! [`Capability`] so that views and the route guard consult one table instead
//! of comparing role names inline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator. Sees every unit; holds no department.
    Admin,
    /// Member of the audit department. Manages paras and sends reminders.
    Audit,
    /// Member of an audited department.
    Department,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Audit, Role::Department];

    /// Lowercase name used in tokens and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Audit => "audit",
            Role::Department => "department",
        }
    }

    /// Whether records with this role must carry a department.
    pub fn requires_department(&self) -> bool {
        !matches!(self, Role::Admin)
    }

    /// Capabilities granted to this role.
    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Admin => &[Capability::ViewDashboard, Capability::ViewParas],
            Role::Audit => &[
                Capability::ViewDashboard,
                Capability::ViewParas,
                Capability::EditPara,
                Capability::UploadDocument,
                Capability::AssignUser,
                Capability::SendReminders,
            ],
            Role::Department => &[Capability::ViewDashboard, Capability::ViewParas],
        }
    }

    /// Check whether this role holds a capability.
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "audit" => Ok(Role::Audit),
            "department" => Ok(Role::Department),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Returned when a role name is not one of `admin`, `audit`, `department`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// A named permission checked by the route guard and by views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Open the overview dashboard.
    ViewDashboard,
    /// Open para history, para details and audit breakdowns.
    ViewParas,
    /// Edit a para.
    EditPara,
    /// Attach a document to a para.
    UploadDocument,
    /// Reassign a para to another user.
    AssignUser,
    /// Open the reminder-email panel and compose reminders.
    SendReminders,
}

impl Capability {
    /// Message shown when an identity lacks this capability.
    pub fn denied_message(&self) -> &'static str {
        match self {
            Capability::ViewDashboard | Capability::ViewParas => {
                "You do not have access to this page."
            }
            Capability::EditPara
            | Capability::UploadDocument
            | Capability::AssignUser
            | Capability::SendReminders => "Access restricted to Audit Department only.",
        }
    }
}

/// The authenticated user, stripped of credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Identity {
    /// Check whether this identity holds a capability.
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Department name for display, or a placeholder for admins.
    pub fn department_label(&self) -> &str {
        self.department.as_deref().unwrap_or("All Units")
    }
}
