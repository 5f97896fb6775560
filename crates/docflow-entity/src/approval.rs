//! Approval (audit) records: one immutable row per committed transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::document::DocumentStatus;
use crate::user::UserRole;

/// The action label recorded with each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transition_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    /// Submitted for review.
    Submitted,
    /// Review started.
    Reviewed,
    /// Revision requested.
    RequestedRevision,
    /// Verified.
    Verified,
    /// Approved.
    Approved,
    /// Published.
    Published,
    /// Rejected.
    Rejected,
    /// Archived.
    Archived,
    /// Reopened as a draft after rejection.
    Reopened,
}

impl TransitionAction {
    /// The action label for an edge of the transition table.
    ///
    /// Returns `None` for pairs outside the table; the state machine has
    /// already rejected those by the time an action is derived.
    pub fn for_transition(from: DocumentStatus, to: DocumentStatus) -> Option<TransitionAction> {
        use DocumentStatus::*;
        match (from, to) {
            (Draft | NeedsRevision, Submitted) => Some(Self::Submitted),
            (Submitted, UnderReview) => Some(Self::Reviewed),
            (UnderReview | Verified, NeedsRevision) => Some(Self::RequestedRevision),
            (UnderReview, Verified) => Some(Self::Verified),
            (Verified, Approved) => Some(Self::Approved),
            (Approved, Published) => Some(Self::Published),
            (Submitted | UnderReview | Verified, Rejected) => Some(Self::Rejected),
            (Published, Archived) => Some(Self::Archived),
            (Rejected, Draft) => Some(Self::Reopened),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted for Review",
            Self::Reviewed => "Started Review",
            Self::RequestedRevision => "Requested Revision",
            Self::Verified => "Verified Document",
            Self::Approved => "Approved Document",
            Self::Published => "Published Document",
            Self::Rejected => "Rejected Document",
            Self::Archived => "Archived Document",
            Self::Reopened => "Reopened Document",
        }
    }
}

/// An immutable audit record of one committed lifecycle transition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentApproval {
    /// Unique record identifier.
    pub id: Uuid,
    /// The document that transitioned.
    pub document_id: Uuid,
    /// The revision current at the time, if any.
    pub revision_id: Option<Uuid>,
    /// Status before the transition.
    pub previous_status: DocumentStatus,
    /// Status after the transition.
    pub new_status: DocumentStatus,
    /// The action performed.
    pub action: TransitionAction,
    /// The acting user.
    pub user_id: Uuid,
    /// The acting user's role at the time of the action.
    pub user_role: UserRole,
    /// Free-text comment (revision notes, rejection reason).
    pub comments: Option<String>,
    /// IP address of the request, for forensic traceability.
    pub ip_address: Option<String>,
    /// User-Agent of the request.
    pub user_agent: Option<String>,
    /// When the transition committed.
    pub created_at: DateTime<Utc>,
}

/// Data for appending a new approval record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApproval {
    /// The document that transitioned.
    pub document_id: Uuid,
    /// The revision current at the time, if any.
    pub revision_id: Option<Uuid>,
    /// Status before the transition.
    pub previous_status: DocumentStatus,
    /// Status after the transition.
    pub new_status: DocumentStatus,
    /// The action performed.
    pub action: TransitionAction,
    /// The acting user.
    pub user_id: Uuid,
    /// The acting user's role at the time of the action.
    pub user_role: UserRole,
    /// Free-text comment.
    pub comments: Option<String>,
    /// IP address of the request.
    pub ip_address: Option<String>,
    /// User-Agent of the request.
    pub user_agent: Option<String>,
}

/// Position of a status on the forward path, for progression classification.
fn progression_index(status: DocumentStatus) -> Option<usize> {
    use DocumentStatus::*;
    [Draft, Submitted, UnderReview, Verified, Approved, Published]
        .iter()
        .position(|s| *s == status)
}

impl DocumentApproval {
    /// Whether this action moved the document forward along the main path.
    pub fn is_progression(&self) -> bool {
        match (
            progression_index(self.previous_status),
            progression_index(self.new_status),
        ) {
            (Some(prev), Some(new)) => new > prev,
            _ => false,
        }
    }

    /// Whether this action sent the document backwards.
    pub fn is_regression(&self) -> bool {
        matches!(
            self.new_status,
            DocumentStatus::NeedsRevision | DocumentStatus::Rejected
        )
    }

    /// Minutes elapsed since a previous action on the same document.
    pub fn minutes_since(&self, previous: &DocumentApproval) -> i64 {
        (self.created_at - previous.created_at).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(previous: DocumentStatus, new: DocumentStatus) -> DocumentApproval {
        DocumentApproval {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            revision_id: None,
            previous_status: previous,
            new_status: new,
            action: TransitionAction::for_transition(previous, new).unwrap(),
            user_id: Uuid::new_v4(),
            user_role: UserRole::Admin,
            comments: None,
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_action_for_every_edge() {
        for from in DocumentStatus::ALL {
            for to in from.allowed_targets() {
                assert!(
                    TransitionAction::for_transition(from, *to).is_some(),
                    "edge {from} -> {to} has no action label"
                );
            }
        }
    }

    #[test]
    fn test_progression_classification() {
        assert!(record(DocumentStatus::Draft, DocumentStatus::Submitted).is_progression());
        assert!(record(DocumentStatus::UnderReview, DocumentStatus::Verified).is_progression());
        assert!(!record(DocumentStatus::UnderReview, DocumentStatus::NeedsRevision).is_progression());
    }

    #[test]
    fn test_regression_classification() {
        assert!(record(DocumentStatus::UnderReview, DocumentStatus::Rejected).is_regression());
        assert!(record(DocumentStatus::Verified, DocumentStatus::NeedsRevision).is_regression());
        assert!(!record(DocumentStatus::Approved, DocumentStatus::Published).is_regression());
    }
}
