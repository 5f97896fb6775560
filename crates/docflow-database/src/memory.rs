//! In-memory store implementations using a Tokio mutex.
//!
//! Suitable for single-node setups and tests. One [`MemoryStore`] value
//! implements every store port over a single shared state, so the
//! transition commit observes the same atomicity as the Postgres
//! transaction: the guard check, the row write, and the audit append all
//! happen under one lock hold.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::types::pagination::{PageRequest, PageResponse};
use docflow_entity::access::{AccessKind, AccessRecord, CreateAccessRecord, DeviceInfo};
use docflow_entity::approval::{CreateApproval, DocumentApproval};
use docflow_entity::document::{Document, DocumentStatus};
use docflow_entity::revision::{CreateRevision, DocumentRevision};

use crate::store::{
    AccessStore, ApprovalStore, DocumentStore, RevisionStore, StatusCount, TransitionGuard,
};

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<Uuid, Document>,
    revisions: Vec<DocumentRevision>,
    approvals: Vec<DocumentApproval>,
    accesses: Vec<AccessRecord>,
    sequences: HashMap<(Uuid, Uuid, i32, u32), i64>,
}

/// In-memory implementation of all store ports.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, document: &Document) -> AppResult<Document> {
        let mut inner = self.inner.lock().await;
        if inner.documents.contains_key(&document.id) {
            return Err(AppError::conflict(format!(
                "Document {} already exists",
                document.id
            )));
        }
        if inner
            .documents
            .values()
            .any(|d| d.document_number == document.document_number)
        {
            return Err(AppError::conflict(format!(
                "Document number '{}' already exists",
                document.document_number
            )));
        }
        inner.documents.insert(document.id, document.clone());
        Ok(document.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .documents
            .get(&id)
            .filter(|d| !d.is_deleted())
            .cloned())
    }

    async fn find_by_number(&self, number: &str) -> AppResult<Option<Document>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .documents
            .values()
            .find(|d| d.document_number == number && !d.is_deleted())
            .cloned())
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        let mut inner = self.inner.lock().await;
        let existing = inner
            .documents
            .get_mut(&document.id)
            .filter(|d| !d.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Document {} not found", document.id)))?;
        *existing = document.clone();
        Ok(document.clone())
    }

    async fn commit_transition(
        &self,
        update: &Document,
        guard: TransitionGuard,
        audit: &CreateApproval,
    ) -> AppResult<(Document, DocumentApproval)> {
        let mut inner = self.inner.lock().await;

        let current = inner
            .documents
            .get(&update.id)
            .filter(|d| !d.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Document {} not found", update.id)))?;

        if current.status != guard.expected_status
            || current.updated_at != guard.expected_updated_at
        {
            return Err(AppError::concurrent_modification(format!(
                "Document {} changed while the transition was in flight",
                update.id
            )));
        }

        inner.documents.insert(update.id, update.clone());

        let approval = DocumentApproval {
            id: Uuid::new_v4(),
            document_id: audit.document_id,
            revision_id: audit.revision_id,
            previous_status: audit.previous_status,
            new_status: audit.new_status,
            action: audit.action,
            user_id: audit.user_id,
            user_role: audit.user_role,
            comments: audit.comments.clone(),
            ip_address: audit.ip_address.clone(),
            user_agent: audit.user_agent.clone(),
            created_at: Utc::now(),
        };
        inner.approvals.push(approval.clone());

        Ok((update.clone(), approval))
    }

    async fn next_sequence(
        &self,
        department_id: Uuid,
        section_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<i64> {
        let mut inner = self.inner.lock().await;
        let counter = inner
            .sequences
            .entry((department_id, section_id, year, month))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn increment_access_counter(&self, id: Uuid, kind: AccessKind) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        if let Some(document) = inner.documents.get_mut(&id) {
            match kind {
                AccessKind::View => document.view_count += 1,
                AccessKind::Download => document.download_count += 1,
            }
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        let document = inner
            .documents
            .get_mut(&id)
            .filter(|d| !d.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
        document.deleted_at = Some(at);
        document.updated_at = at;
        Ok(())
    }

    async fn list_page(&self, page: &PageRequest) -> AppResult<PageResponse<Document>> {
        let inner = self.inner.lock().await;
        let mut documents: Vec<Document> = inner
            .documents
            .values()
            .filter(|d| !d.is_deleted())
            .cloned()
            .collect();
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = documents.len() as u64;
        let items = documents
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn find_expired_published(&self, as_of: NaiveDate) -> AppResult<Vec<Document>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .documents
            .values()
            .filter(|d| {
                !d.is_deleted()
                    && d.status == DocumentStatus::Published
                    && d.expiry_date.is_some_and(|expiry| expiry < as_of)
            })
            .cloned()
            .collect())
    }

    async fn count_by_status(&self) -> AppResult<Vec<StatusCount>> {
        let inner = self.inner.lock().await;
        let mut counts: HashMap<DocumentStatus, i64> = HashMap::new();
        for document in inner.documents.values().filter(|d| !d.is_deleted()) {
            *counts.entry(document.status).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }
}

#[async_trait]
impl RevisionStore for MemoryStore {
    async fn append(&self, revision: &CreateRevision) -> AppResult<DocumentRevision> {
        let mut inner = self.inner.lock().await;
        let row = DocumentRevision {
            id: Uuid::new_v4(),
            document_id: revision.document_id,
            version: revision.version.clone(),
            status: revision.status,
            original_filename: revision.original_filename.clone(),
            file_path: revision.file_path.clone(),
            file_type: revision.file_type.clone(),
            file_size: revision.file_size,
            file_hash: revision.file_hash.clone(),
            revision_notes: revision.revision_notes.clone(),
            created_by: revision.created_by,
            created_at: Utc::now(),
        };
        inner.revisions.push(row.clone());
        Ok(row)
    }

    async fn list_for_document(&self, document_id: Uuid) -> AppResult<Vec<DocumentRevision>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .revisions
            .iter()
            .filter(|r| r.document_id == document_id)
            .cloned()
            .collect())
    }

    async fn latest(&self, document_id: Uuid) -> AppResult<Option<DocumentRevision>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .revisions
            .iter()
            .filter(|r| r.document_id == document_id)
            .next_back()
            .cloned())
    }
}

#[async_trait]
impl ApprovalStore for MemoryStore {
    async fn list_for_document(&self, document_id: Uuid) -> AppResult<Vec<DocumentApproval>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .approvals
            .iter()
            .filter(|a| a.document_id == document_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccessStore for MemoryStore {
    async fn append(&self, record: &CreateAccessRecord) -> AppResult<AccessRecord> {
        let mut inner = self.inner.lock().await;
        let device = DeviceInfo::from_user_agent(record.user_agent.as_deref());
        let row = AccessRecord {
            id: Uuid::new_v4(),
            document_id: record.document_id,
            user_id: record.user_id,
            kind: record.kind,
            method: record.method,
            device_type: device.device_type,
            browser: device.browser,
            platform: device.platform,
            ip_address: record.ip_address.clone(),
            user_agent: record.user_agent.clone(),
            is_successful: record.is_successful,
            error_message: record.error_message.clone(),
            bytes_served: record.bytes_served,
            created_at: Utc::now(),
        };
        inner.accesses.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docflow_entity::approval::TransitionAction;
    use docflow_entity::user::UserRole;

    fn document(status: DocumentStatus) -> Document {
        let now = Utc::now();
        Document {
            id: Uuid::new_v4(),
            document_number: format!("AKM-IT-DEV-2025-08-{:04}", now.timestamp_subsec_micros()),
            title: "Test".to_string(),
            description: None,
            document_type: "general".to_string(),
            status,
            version: "1.0".to_string(),
            original_filename: None,
            file_path: None,
            file_type: None,
            file_size: None,
            file_hash: None,
            qr_code_path: None,
            qr_code_token: None,
            is_confidential: false,
            effective_date: None,
            expiry_date: None,
            tags: Vec::new(),
            department_id: Uuid::new_v4(),
            section_id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            reviewer_id: None,
            approver_id: None,
            view_count: 0,
            download_count: 0,
            submitted_at: None,
            reviewed_at: None,
            verified_at: None,
            approved_at: None,
            published_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_commit_transition_guard() {
        let store = MemoryStore::new();
        let doc = document(DocumentStatus::Draft);
        store.insert(&doc).await.unwrap();

        let guard = TransitionGuard {
            expected_status: DocumentStatus::Draft,
            expected_updated_at: doc.updated_at,
        };
        let audit = CreateApproval {
            document_id: doc.id,
            revision_id: None,
            previous_status: DocumentStatus::Draft,
            new_status: DocumentStatus::Submitted,
            action: TransitionAction::Submitted,
            user_id: doc.creator_id,
            user_role: UserRole::User,
            comments: None,
            ip_address: None,
            user_agent: None,
        };

        let mut update = doc.clone();
        update.status = DocumentStatus::Submitted;
        update.updated_at = Utc::now();

        let (committed, approval) = store
            .commit_transition(&update, guard, &audit)
            .await
            .unwrap();
        assert_eq!(committed.status, DocumentStatus::Submitted);
        assert_eq!(approval.new_status, DocumentStatus::Submitted);

        // Second commit with the now-stale guard must lose.
        let err = store
            .commit_transition(&update, guard, &audit)
            .await
            .unwrap_err();
        assert_eq!(
            err.kind,
            docflow_core::error::ErrorKind::ConcurrentModification
        );
    }

    #[tokio::test]
    async fn test_sequences_are_monotonic_per_bucket() {
        let store = MemoryStore::new();
        let dept = Uuid::new_v4();
        let sect = Uuid::new_v4();
        assert_eq!(store.next_sequence(dept, sect, 2025, 8).await.unwrap(), 1);
        assert_eq!(store.next_sequence(dept, sect, 2025, 8).await.unwrap(), 2);
        assert_eq!(store.next_sequence(dept, sect, 2025, 9).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_soft_deleted_documents_are_hidden() {
        let store = MemoryStore::new();
        let doc = document(DocumentStatus::Draft);
        store.insert(&doc).await.unwrap();
        store.soft_delete(doc.id, Utc::now()).await.unwrap();
        assert!(store.find_by_id(doc.id).await.unwrap().is_none());
    }
}
