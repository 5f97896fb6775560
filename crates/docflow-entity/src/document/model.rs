//! Document entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::DocumentStatus;
use crate::user::UserRole;

/// A controlled document.
///
/// `status` is only ever mutated through the lifecycle engine; `document_number`
/// is assigned exactly once at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: Uuid,
    /// Human-readable, externally visible number (`CODE-DEPT-SECT-YYYY-MM-NNNN`).
    pub document_number: String,
    /// Document title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Coarse classification (e.g. "general", "procedure", "policy").
    pub document_type: String,
    /// Current lifecycle status.
    pub status: DocumentStatus,
    /// Current revision version ("major.minor").
    pub version: String,
    /// Original name of the uploaded file, if one is attached.
    pub original_filename: Option<String>,
    /// Storage path of the current file, if one is attached.
    pub file_path: Option<String>,
    /// File extension/type of the current file.
    pub file_type: Option<String>,
    /// Size in bytes of the current file.
    pub file_size: Option<i64>,
    /// SHA-256 hash of the current file.
    pub file_hash: Option<String>,
    /// Storage path of the QR artifact, once generated.
    pub qr_code_path: Option<String>,
    /// Verification token embedded in the QR validation URL.
    pub qr_code_token: Option<String>,
    /// Whether the document is confidential (never publicly visible).
    pub is_confidential: bool,
    /// Date the document takes effect.
    pub effective_date: Option<NaiveDate>,
    /// Date the document expires; published documents past this are archived.
    pub expiry_date: Option<NaiveDate>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// The owning department.
    pub department_id: Uuid,
    /// The owning section.
    pub section_id: Uuid,
    /// The user who created the document.
    pub creator_id: Uuid,
    /// The reviewer currently assigned, once review has started.
    pub reviewer_id: Option<Uuid>,
    /// The approver, once approved.
    pub approver_id: Option<Uuid>,
    /// Number of recorded views.
    pub view_count: i64,
    /// Number of recorded downloads.
    pub download_count: i64,
    /// When the document was last submitted.
    pub submitted_at: Option<DateTime<Utc>>,
    /// When review last started.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When the document was last verified.
    pub verified_at: Option<DateTime<Utc>>,
    /// When the document was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the document was published.
    pub published_at: Option<DateTime<Utc>>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated. Also the optimistic-concurrency
    /// token for lifecycle transitions.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp; default queries exclude rows where set.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Whether a file is attached.
    pub fn has_file(&self) -> bool {
        self.file_path.is_some() && self.original_filename.is_some()
    }

    /// Whether the document is published.
    pub fn is_published(&self) -> bool {
        self.status == DocumentStatus::Published
    }

    /// Published and not confidential: visible without authentication.
    pub fn is_publicly_accessible(&self) -> bool {
        self.is_published() && !self.is_confidential
    }

    /// Whether the document satisfies the submission preconditions.
    pub fn can_be_submitted(&self) -> bool {
        self.has_file()
            && matches!(
                self.status,
                DocumentStatus::Draft | DocumentStatus::NeedsRevision
            )
    }

    /// Whether the given actor may edit this document's metadata or file.
    ///
    /// Combines the status edit table with ownership: a plain user may only
    /// touch documents they created.
    pub fn can_be_edited_by(&self, user_id: Uuid, role: UserRole) -> bool {
        if !self.status.editable_by(role) {
            return false;
        }
        match role {
            UserRole::User => self.creator_id == user_id,
            UserRole::Admin | UserRole::SuperAdmin => true,
        }
    }

    /// Whether a QR artifact has been generated.
    pub fn has_qr_code(&self) -> bool {
        self.qr_code_path.is_some() && self.qr_code_token.is_some()
    }

    /// Whether the document is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input for creating a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Document title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Coarse classification; defaults to "general" when empty.
    pub document_type: Option<String>,
    /// Whether the document is confidential.
    pub is_confidential: bool,
    /// Date the document takes effect.
    pub effective_date: Option<NaiveDate>,
    /// Date the document expires.
    pub expiry_date: Option<NaiveDate>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// A metadata-only update to a document.
///
/// `None` fields are left untouched; file and status changes go through
/// their dedicated operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPatch {
    /// New title.
    pub title: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New document type.
    pub document_type: Option<String>,
    /// New confidentiality flag.
    pub is_confidential: Option<bool>,
    /// New effective date.
    pub effective_date: Option<Option<NaiveDate>>,
    /// New expiry date.
    pub expiry_date: Option<Option<NaiveDate>>,
    /// New tag set.
    pub tags: Option<Vec<String>>,
}
