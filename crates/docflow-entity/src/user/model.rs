//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UserRole;

/// A user account, as far as the document lifecycle needs to know it.
///
/// Account management (passwords, sessions, invitations) is an external
/// collaborator; this row exists to anchor ownership and audit references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login/display name.
    pub username: String,
    /// The user's role.
    pub role: UserRole,
    /// The department the user belongs to.
    pub department_id: Option<Uuid>,
    /// The section the user belongs to.
    pub section_id: Option<Uuid>,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
