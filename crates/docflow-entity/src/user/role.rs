//! User role enumeration and the capability set each role grants.
//!
//! The state machine checks capabilities, never role identity, so the
//! role-to-capability mapping here is the only place authorization policy
//! lives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use docflow_core::AppError;

/// A permission bit derived from a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Start reviews, verify, request revision, reject.
    Review,
    /// Approve verified documents and publish approved ones.
    Approve,
    /// Manage user accounts.
    ManageUsers,
}

/// Roles available in the document-control system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Basic document creation and viewing access.
    User,
    /// Document review and verification authority.
    Admin,
    /// Full system access and final approval authority.
    SuperAdmin,
}

impl UserRole {
    /// Whether this role grants the given capability.
    pub fn has_capability(self, capability: Capability) -> bool {
        match capability {
            Capability::Review => matches!(self, Self::Admin | Self::SuperAdmin),
            Capability::Approve | Capability::ManageUsers => matches!(self, Self::SuperAdmin),
        }
    }

    /// Whether this role may review documents.
    pub fn can_review(self) -> bool {
        self.has_capability(Capability::Review)
    }

    /// Whether this role may approve and publish documents.
    pub fn can_approve(self) -> bool {
        self.has_capability(Capability::Approve)
    }

    /// Whether this role may manage user accounts.
    pub fn can_manage_users(self) -> bool {
        self.has_capability(Capability::ManageUsers)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Administrator",
            Self::SuperAdmin => "Super Administrator",
        }
    }

    /// Return the role as its lowercase wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "superadmin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: user, admin, superadmin"
            ))),
        }
    }
}
