//! Departments and sections.
//!
//! Organizational management lives outside the core; these rows exist to
//! own documents and to contribute their codes to document numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A department.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Unique department identifier.
    pub id: Uuid,
    /// Short code used in document numbers (e.g. "IT").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether the department is active.
    pub is_active: bool,
    /// When the department was created.
    pub created_at: DateTime<Utc>,
}

/// A section within a department.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    /// Unique section identifier.
    pub id: Uuid,
    /// The owning department.
    pub department_id: Uuid,
    /// Short code used in document numbers (e.g. "DEV").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether the section is active.
    pub is_active: bool,
    /// When the section was created.
    pub created_at: DateTime<Utc>,
}
