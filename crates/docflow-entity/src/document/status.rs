//! Document lifecycle status enumeration.
//!
//! The allowed-transition table in [`DocumentStatus::allowed_targets`] is the
//! single source of truth for lifecycle ordering. The state machine validates
//! against it and UIs list next actions from it; nothing else encodes edges.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use docflow_core::AppError;

use crate::user::UserRole;

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Document is being prepared.
    Draft,
    /// Document submitted for review.
    Submitted,
    /// Document is being reviewed.
    UnderReview,
    /// Document requires revision.
    NeedsRevision,
    /// Document verified by a reviewer.
    Verified,
    /// Document approved for publication.
    Approved,
    /// Document published and accessible to the public.
    Published,
    /// Document rejected.
    Rejected,
    /// Document archived. Terminal.
    Archived,
}

impl DocumentStatus {
    /// All statuses, in progression order.
    pub const ALL: [DocumentStatus; 9] = [
        Self::Draft,
        Self::Submitted,
        Self::UnderReview,
        Self::NeedsRevision,
        Self::Verified,
        Self::Approved,
        Self::Published,
        Self::Rejected,
        Self::Archived,
    ];

    /// The statuses reachable from this one.
    pub fn allowed_targets(self) -> &'static [DocumentStatus] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::Submitted => &[Self::UnderReview, Self::Rejected],
            Self::UnderReview => &[Self::NeedsRevision, Self::Verified, Self::Rejected],
            Self::NeedsRevision => &[Self::Submitted],
            Self::Verified => &[Self::Approved, Self::NeedsRevision, Self::Rejected],
            Self::Approved => &[Self::Published],
            Self::Published => &[Self::Archived],
            Self::Rejected => &[Self::Draft],
            Self::Archived => &[],
        }
    }

    /// Whether the transition `self -> target` is in the allowed table.
    pub fn can_transition_to(self, target: DocumentStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Whether no transitions leave this status.
    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    /// Which roles may edit a document's metadata/file while it is in this
    /// status. Ownership narrows this further for `UserRole::User`.
    pub fn editable_by(self, role: UserRole) -> bool {
        match self {
            Self::Draft | Self::NeedsRevision => true,
            Self::Submitted | Self::UnderReview => role.can_review(),
            Self::Verified => role.can_approve(),
            _ => false,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::NeedsRevision => "Needs Revision",
            Self::Verified => "Verified",
            Self::Approved => "Approved",
            Self::Published => "Published",
            Self::Rejected => "Rejected",
            Self::Archived => "Archived",
        }
    }

    /// Wire value (matches the database enum and serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::NeedsRevision => "needs_revision",
            Self::Verified => "verified",
            Self::Approved => "approved",
            Self::Published => "published",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "needs_revision" => Ok(Self::NeedsRevision),
            "verified" => Ok(Self::Verified),
            "approved" => Ok(Self::Approved),
            "published" => Ok(Self::Published),
            "rejected" => Ok(Self::Rejected),
            "archived" => Ok(Self::Archived),
            _ => Err(AppError::validation(format!(
                "Invalid document status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archived_is_terminal() {
        assert!(DocumentStatus::Archived.is_terminal());
        for status in DocumentStatus::ALL {
            if status != DocumentStatus::Archived {
                assert!(!status.is_terminal(), "{status} should have outgoing edges");
            }
        }
    }

    #[test]
    fn test_transition_table_edges() {
        use DocumentStatus::*;
        assert!(Draft.can_transition_to(Submitted));
        assert!(!Draft.can_transition_to(Published));
        assert!(UnderReview.can_transition_to(Verified));
        assert!(UnderReview.can_transition_to(Rejected));
        assert!(Verified.can_transition_to(NeedsRevision));
        assert!(Rejected.can_transition_to(Draft));
        assert!(!Published.can_transition_to(Draft));
    }

    #[test]
    fn test_every_status_reachable_from_draft() {
        use std::collections::HashSet;
        let mut seen: HashSet<DocumentStatus> = HashSet::new();
        let mut stack = vec![DocumentStatus::Draft];
        while let Some(status) = stack.pop() {
            if seen.insert(status) {
                stack.extend(status.allowed_targets());
            }
        }
        assert_eq!(seen.len(), DocumentStatus::ALL.len());
    }

    #[test]
    fn test_edit_table() {
        use DocumentStatus::*;
        assert!(Draft.editable_by(UserRole::User));
        assert!(Submitted.editable_by(UserRole::Admin));
        assert!(!Submitted.editable_by(UserRole::User));
        assert!(Verified.editable_by(UserRole::SuperAdmin));
        assert!(!Verified.editable_by(UserRole::Admin));
        assert!(!Published.editable_by(UserRole::SuperAdmin));
    }

    #[test]
    fn test_wire_round_trip() {
        for status in DocumentStatus::ALL {
            assert_eq!(status.as_str().parse::<DocumentStatus>().unwrap(), status);
        }
    }
}
