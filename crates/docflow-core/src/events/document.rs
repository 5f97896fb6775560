//! Document lifecycle events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The semantic kind of a committed lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// A document was submitted for review.
    Submitted,
    /// A reviewer started reviewing a submitted document.
    ReviewStarted,
    /// A reviewer sent the document back for revision.
    RevisionRequested,
    /// A reviewer verified the document.
    Verified,
    /// An approver approved the verified document.
    Approved,
    /// An approved document was published.
    Published,
    /// The document was rejected.
    Rejected,
    /// A published document was archived.
    Archived,
    /// A rejected document was reopened as a draft.
    Reopened,
}

/// A committed lifecycle transition, emitted after the status change and its
/// audit record have been persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEvent {
    /// The semantic transition kind.
    pub kind: TransitionKind,
    /// The document's ID.
    pub document_id: Uuid,
    /// The human-readable document number.
    pub document_number: String,
    /// The document title.
    pub title: String,
    /// The wire value of the status before the transition.
    pub previous_status: String,
    /// The wire value of the status after the transition.
    pub new_status: String,
    /// The user who performed the transition.
    pub actor_id: Uuid,
    /// Optional comment attached to the transition (revision notes,
    /// rejection reason).
    pub comment: Option<String>,
    /// When the transition committed.
    pub occurred_at: DateTime<Utc>,
}
