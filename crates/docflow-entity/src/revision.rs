//! Revision snapshots: immutable copies of a document's file and status at
//! a version number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::document::DocumentStatus;

/// An immutable snapshot of a document's file at a point in time.
///
/// Created whenever a file is attached or replaced, independent of status
/// transitions, so a draft can accumulate revisions before first submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRevision {
    /// Unique revision identifier.
    pub id: Uuid,
    /// The document this revision belongs to.
    pub document_id: Uuid,
    /// Version number ("major.minor") of this snapshot.
    pub version: String,
    /// The document's status when the snapshot was taken.
    pub status: DocumentStatus,
    /// Original name of the snapshotted file.
    pub original_filename: String,
    /// Storage path of the snapshotted file.
    pub file_path: String,
    /// File extension/type.
    pub file_type: Option<String>,
    /// Size in bytes.
    pub file_size: i64,
    /// SHA-256 hash of the file content.
    pub file_hash: String,
    /// Notes describing what changed in this revision.
    pub revision_notes: Option<String>,
    /// The user who created this revision.
    pub created_by: Uuid,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
}

impl DocumentRevision {
    /// Whether this snapshot is a major revision (minor component zero).
    pub fn is_major(&self) -> bool {
        self.version
            .split_once('.')
            .is_some_and(|(_, minor)| minor == "0")
    }
}

/// Data for appending a new revision snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRevision {
    /// The document being snapshotted.
    pub document_id: Uuid,
    /// Version number of the snapshot.
    pub version: String,
    /// The document's status at snapshot time.
    pub status: DocumentStatus,
    /// Original name of the file.
    pub original_filename: String,
    /// Storage path of the file.
    pub file_path: String,
    /// File extension/type.
    pub file_type: Option<String>,
    /// Size in bytes.
    pub file_size: i64,
    /// SHA-256 hash.
    pub file_hash: String,
    /// Notes describing the change.
    pub revision_notes: Option<String>,
    /// The user creating the revision.
    pub created_by: Uuid,
}
