//! Store ports consumed by the service layer.
//!
//! Each trait has a Postgres implementation in [`crate::repositories`] and
//! an in-memory implementation in [`crate::memory`]. Services depend on the
//! trait objects, never on a concrete backend.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use docflow_core::result::AppResult;
use docflow_core::types::pagination::{PageRequest, PageResponse};
use docflow_entity::access::{AccessKind, AccessRecord, CreateAccessRecord};
use docflow_entity::approval::{CreateApproval, DocumentApproval};
use docflow_entity::document::{Document, DocumentStatus};
use docflow_entity::revision::{CreateRevision, DocumentRevision};

/// Optimistic-concurrency guard for a lifecycle transition.
///
/// Both fields must match the stored row at commit time; a mismatch means
/// another transition won the race.
#[derive(Debug, Clone, Copy)]
pub struct TransitionGuard {
    /// The status the document had when the transition was validated.
    pub expected_status: DocumentStatus,
    /// The `updated_at` the document had when the transition was validated.
    pub expected_updated_at: DateTime<Utc>,
}

/// Count of documents in one status.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct StatusCount {
    /// The status.
    pub status: DocumentStatus,
    /// How many non-deleted documents currently hold it.
    pub count: i64,
}

/// Persistence port for the document aggregate.
///
/// All queries exclude soft-deleted rows unless stated otherwise.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a fully constructed document row.
    async fn insert(&self, document: &Document) -> AppResult<Document>;

    /// Find a document by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>>;

    /// Find a document by its document number.
    async fn find_by_number(&self, number: &str) -> AppResult<Option<Document>>;

    /// Update a document row (metadata, file fields, QR fields).
    ///
    /// Not for status changes; those go through [`Self::commit_transition`].
    async fn update(&self, document: &Document) -> AppResult<Document>;

    /// Atomically commit a lifecycle transition: write the updated row if
    /// and only if the guard still matches, and append its audit record in
    /// the same unit of work.
    ///
    /// Fails with `ConcurrentModification` when the guard no longer holds.
    async fn commit_transition(
        &self,
        update: &Document,
        guard: TransitionGuard,
        audit: &CreateApproval,
    ) -> AppResult<(Document, DocumentApproval)>;

    /// Allocate the next document-number sequence value for a
    /// (department, section, year, month) bucket. Monotonic and
    /// collision-free under concurrent creates.
    async fn next_sequence(
        &self,
        department_id: Uuid,
        section_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<i64>;

    /// Increment the view/download counter for a document.
    async fn increment_access_counter(&self, id: Uuid, kind: AccessKind) -> AppResult<()>;

    /// Soft-delete a document.
    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// List documents, newest first.
    async fn list_page(&self, page: &PageRequest) -> AppResult<PageResponse<Document>>;

    /// Published documents whose expiry date has passed.
    async fn find_expired_published(&self, as_of: NaiveDate) -> AppResult<Vec<Document>>;

    /// Counts of non-deleted documents grouped by status.
    async fn count_by_status(&self) -> AppResult<Vec<StatusCount>>;
}

/// Persistence port for revision snapshots. Append-only.
#[async_trait]
pub trait RevisionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append a new revision snapshot.
    async fn append(&self, revision: &CreateRevision) -> AppResult<DocumentRevision>;

    /// All revisions of a document, oldest first.
    async fn list_for_document(&self, document_id: Uuid) -> AppResult<Vec<DocumentRevision>>;

    /// The most recent revision of a document, if any.
    async fn latest(&self, document_id: Uuid) -> AppResult<Option<DocumentRevision>>;
}

/// Query port for approval records. Records are appended exclusively by
/// [`DocumentStore::commit_transition`].
#[async_trait]
pub trait ApprovalStore: Send + Sync + std::fmt::Debug + 'static {
    /// All approval records for a document, oldest first. Creation order
    /// reconstructs the full transition history.
    async fn list_for_document(&self, document_id: Uuid) -> AppResult<Vec<DocumentApproval>>;
}

/// Persistence port for access records. Append-only.
#[async_trait]
pub trait AccessStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append an access record.
    async fn append(&self, record: &CreateAccessRecord) -> AppResult<AccessRecord>;
}
