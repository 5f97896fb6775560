//! Document CRUD, file attachment, access tracking, and QR verification.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::traits::{EffectQueue, QrArtifact, SideEffect, StorageProvider};
use docflow_core::types::pagination::{PageRequest, PageResponse};
use docflow_database::{
    AccessStore, ApprovalStore, DocumentStore, RevisionStore, StatusCount,
};
use docflow_entity::access::{AccessKind, AccessMethod, AccessRecord, CreateAccessRecord};
use docflow_entity::approval::DocumentApproval;
use docflow_entity::department::{Department, Section};
use docflow_entity::document::{
    CreateDocument, Document, DocumentPatch, DocumentStatus, VersionNumber,
};
use docflow_entity::revision::{CreateRevision, DocumentRevision};
use docflow_storage::PathLayout;

use crate::context::RequestContext;
use crate::number::DocumentNumberGenerator;

/// Input for attaching or replacing a document's file.
#[derive(Debug, Clone)]
pub struct AttachFile {
    /// The file content.
    pub data: Bytes,
    /// The uploader's original file name.
    pub original_name: String,
    /// Whether this replacement is a major revision.
    pub is_major: bool,
    /// Notes describing the change.
    pub notes: Option<String>,
}

/// Input for recording a view/download attempt.
///
/// Carried separately from [`RequestContext`] because public QR and
/// direct-link accesses have no authenticated actor.
#[derive(Debug, Clone)]
pub struct RecordAccess {
    /// The accessing user, if authenticated.
    pub user_id: Option<Uuid>,
    /// View or download.
    pub kind: AccessKind,
    /// Access channel.
    pub method: AccessMethod,
    /// IP address of the request.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Bytes served, for downloads.
    pub bytes_served: Option<i64>,
}

/// Counts of documents per status.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DocumentStatistics {
    /// Total non-deleted documents.
    pub total: i64,
    /// Per-status counts.
    pub by_status: Vec<StatusCount>,
}

/// Handles document creation, files, metadata, and access tracking.
///
/// Lifecycle transitions live in
/// [`LifecycleEngine`](crate::lifecycle::LifecycleEngine); this service
/// never writes `status`.
#[derive(Debug, Clone)]
pub struct DocumentService {
    documents: Arc<dyn DocumentStore>,
    revisions: Arc<dyn RevisionStore>,
    approvals: Arc<dyn ApprovalStore>,
    accesses: Arc<dyn AccessStore>,
    storage: Arc<dyn StorageProvider>,
    layout: PathLayout,
    numbers: DocumentNumberGenerator,
    effects: Arc<dyn EffectQueue>,
}

impl DocumentService {
    /// Creates a new document service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        revisions: Arc<dyn RevisionStore>,
        approvals: Arc<dyn ApprovalStore>,
        accesses: Arc<dyn AccessStore>,
        storage: Arc<dyn StorageProvider>,
        layout: PathLayout,
        numbers: DocumentNumberGenerator,
        effects: Arc<dyn EffectQueue>,
    ) -> Self {
        Self {
            documents,
            revisions,
            approvals,
            accesses,
            storage,
            layout,
            numbers,
            effects,
        }
    }

    /// Creates a new document in `Draft`.
    ///
    /// The document number is generated here, exactly once; it never
    /// changes afterwards. The caller resolves the owning department and
    /// section (organizational management is outside the core).
    pub async fn create_document(
        &self,
        input: CreateDocument,
        department: &Department,
        section: &Section,
        ctx: &RequestContext,
    ) -> AppResult<Document> {
        if input.title.trim().is_empty() {
            return Err(AppError::validation("Document title cannot be empty"));
        }
        if !department.is_active || !section.is_active {
            return Err(AppError::validation(
                "Documents can only be created in active departments and sections",
            ));
        }
        if section.department_id != department.id {
            return Err(AppError::validation(format!(
                "Section '{}' does not belong to department '{}'",
                section.code, department.code
            )));
        }

        let now = Utc::now();
        let document_number = self.numbers.generate(department, section, now).await;

        let document = Document {
            id: Uuid::new_v4(),
            document_number,
            title: input.title.trim().to_string(),
            description: input.description,
            document_type: input
                .document_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "general".to_string()),
            status: DocumentStatus::Draft,
            version: VersionNumber::INITIAL.to_string(),
            original_filename: None,
            file_path: None,
            file_type: None,
            file_size: None,
            file_hash: None,
            qr_code_path: None,
            qr_code_token: None,
            is_confidential: input.is_confidential,
            effective_date: input.effective_date,
            expiry_date: input.expiry_date,
            tags: input.tags,
            department_id: department.id,
            section_id: section.id,
            creator_id: ctx.user_id,
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
        };

        let document = self.documents.insert(&document).await?;

        info!(
            document_id = %document.id,
            document_number = %document.document_number,
            user_id = %ctx.user_id,
            "Document created"
        );

        Ok(document)
    }

    /// Loads a document by ID.
    pub async fn get_document(&self, document_id: Uuid) -> AppResult<Document> {
        self.documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))
    }

    /// Lists documents, newest first.
    pub async fn list_documents(&self, page: &PageRequest) -> AppResult<PageResponse<Document>> {
        self.documents.list_page(page).await
    }

    /// Attaches or replaces the document's file, snapshotting a revision.
    ///
    /// The first attachment keeps the document at `1.0`; every subsequent
    /// replacement bumps the version (major or minor per `is_major`).
    pub async fn attach_file(
        &self,
        document_id: Uuid,
        attach: AttachFile,
        ctx: &RequestContext,
    ) -> AppResult<Document> {
        let mut document = self.get_document(document_id).await?;

        if !document.can_be_edited_by(ctx.user_id, ctx.role) {
            return Err(AppError::unauthorized(format!(
                "Document {} cannot be edited in status {} by this actor",
                document.document_number, document.status
            )));
        }
        if attach.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }

        let now = Utc::now();
        let stored_name = PathLayout::stored_filename(&attach.original_name);
        let new_path = self.layout.document_path(document.status, now, &stored_name);

        let file_hash = hex::encode(Sha256::digest(&attach.data));
        let file_size = attach.data.len() as i64;
        let file_type = attach
            .original_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != attach.original_name)
            .map(|ext| ext.to_lowercase());

        self.storage.write(&new_path, attach.data.clone()).await?;

        let version = match self.revisions.latest(document.id).await? {
            None => VersionNumber::INITIAL,
            Some(_) => document
                .version
                .parse::<VersionNumber>()
                .unwrap_or(VersionNumber::INITIAL)
                .next(attach.is_major),
        };

        let old_path = document.file_path.clone();
        document.original_filename = Some(attach.original_name.clone());
        document.file_path = Some(new_path.clone());
        document.file_type = file_type.clone();
        document.file_size = Some(file_size);
        document.file_hash = Some(file_hash.clone());
        document.version = version.to_string();
        document.updated_at = now;

        let document = self.documents.update(&document).await?;

        self.revisions
            .append(&CreateRevision {
                document_id: document.id,
                version: version.to_string(),
                status: document.status,
                original_filename: attach.original_name,
                file_path: new_path,
                file_type,
                file_size,
                file_hash,
                revision_notes: attach.notes,
                created_by: ctx.user_id,
            })
            .await?;

        if let Some(old_path) = old_path {
            if let Err(e) = self.storage.delete(&old_path).await {
                warn!(
                    document_id = %document.id,
                    path = %old_path,
                    error = %e,
                    "Failed to remove replaced file"
                );
            }
        }

        info!(
            document_id = %document.id,
            version = %document.version,
            user_id = %ctx.user_id,
            "File attached"
        );

        Ok(document)
    }

    /// Updates a document's metadata.
    pub async fn update_document(
        &self,
        document_id: Uuid,
        patch: DocumentPatch,
        ctx: &RequestContext,
    ) -> AppResult<Document> {
        let mut document = self.get_document(document_id).await?;

        if !document.can_be_edited_by(ctx.user_id, ctx.role) {
            return Err(AppError::unauthorized(format!(
                "Document {} cannot be edited in status {} by this actor",
                document.document_number, document.status
            )));
        }

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                return Err(AppError::validation("Document title cannot be empty"));
            }
            document.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            document.description = description;
        }
        if let Some(document_type) = patch.document_type {
            document.document_type = document_type;
        }
        if let Some(is_confidential) = patch.is_confidential {
            document.is_confidential = is_confidential;
        }
        if let Some(effective_date) = patch.effective_date {
            document.effective_date = effective_date;
        }
        if let Some(expiry_date) = patch.expiry_date {
            document.expiry_date = expiry_date;
        }
        if let Some(tags) = patch.tags {
            document.tags = tags;
        }
        document.updated_at = Utc::now();

        self.documents.update(&document).await
    }

    /// Soft-deletes a document and removes its stored artifacts.
    ///
    /// Published documents cannot be deleted; archive them instead.
    pub async fn delete_document(&self, document_id: Uuid, ctx: &RequestContext) -> AppResult<()> {
        let document = self.get_document(document_id).await?;

        if ctx.user_id != document.creator_id && !ctx.role.can_manage_users() {
            return Err(AppError::unauthorized(
                "Only the creator or an administrator may delete a document",
            ));
        }
        if document.is_published() {
            return Err(AppError::conflict(
                "Published documents cannot be deleted",
            ));
        }

        for path in [document.file_path.as_deref(), document.qr_code_path.as_deref()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = self.storage.delete(path).await {
                warn!(document_id = %document.id, path, error = %e, "Failed to remove stored artifact");
            }
        }

        self.documents.soft_delete(document.id, Utc::now()).await?;

        info!(
            document_id = %document.id,
            document_number = %document.document_number,
            user_id = %ctx.user_id,
            "Document soft-deleted"
        );

        Ok(())
    }

    /// The document's full transition history, oldest first.
    pub async fn get_history(&self, document_id: Uuid) -> AppResult<Vec<DocumentApproval>> {
        self.get_document(document_id).await?;
        self.approvals.list_for_document(document_id).await
    }

    /// All revision snapshots of a document, oldest first.
    pub async fn list_revisions(&self, document_id: Uuid) -> AppResult<Vec<DocumentRevision>> {
        self.get_document(document_id).await?;
        self.revisions.list_for_document(document_id).await
    }

    /// Records a view/download attempt and bumps the document's counter.
    ///
    /// Guests may only reach published, non-confidential documents; the
    /// refused attempt is still recorded with its failure reason.
    pub async fn record_access(
        &self,
        document_id: Uuid,
        access: RecordAccess,
    ) -> AppResult<AccessRecord> {
        let document = self.get_document(document_id).await?;

        let allowed = access.user_id.is_some() || document.is_publicly_accessible();

        let record = self
            .accesses
            .append(&CreateAccessRecord {
                document_id,
                user_id: access.user_id,
                kind: access.kind,
                method: access.method,
                ip_address: access.ip_address,
                user_agent: access.user_agent,
                is_successful: allowed,
                error_message: (!allowed).then(|| "Document is not publicly accessible".to_string()),
                bytes_served: allowed.then_some(access.bytes_served).flatten(),
            })
            .await?;

        if !allowed {
            return Err(AppError::unauthorized(
                "Document is not publicly accessible",
            ));
        }

        self.documents
            .increment_access_counter(document_id, access.kind)
            .await?;

        Ok(record)
    }

    /// Validates a QR verification token against a published document.
    pub async fn verify_qr_token(&self, document_id: Uuid, token: &str) -> AppResult<Document> {
        let document = self.get_document(document_id).await?;

        let valid = document.is_published()
            && document
                .qr_code_token
                .as_deref()
                .is_some_and(|stored| stored == token);

        if !valid {
            return Err(AppError::unauthorized("Invalid verification token"));
        }
        Ok(document)
    }

    /// Persists a generated QR artifact onto the document.
    ///
    /// Called by the worker after the generator collaborator has rendered
    /// and stored the image.
    pub async fn store_qr_artifact(
        &self,
        document_id: Uuid,
        artifact: QrArtifact,
    ) -> AppResult<Document> {
        let mut document = self.get_document(document_id).await?;

        if !document.is_published() {
            return Err(AppError::validation(format!(
                "QR artifacts only apply to published documents; {} is {}",
                document.document_number, document.status
            )));
        }

        document.qr_code_path = Some(artifact.path);
        document.qr_code_token = Some(artifact.token);
        document.updated_at = Utc::now();
        self.documents.update(&document).await
    }

    /// Requests regeneration of a published document's QR artifact.
    pub async fn regenerate_qr(&self, document_id: Uuid, ctx: &RequestContext) -> AppResult<()> {
        let document = self.get_document(document_id).await?;

        if !ctx.role.can_approve() {
            return Err(AppError::unauthorized(
                "Approval capability is required to regenerate QR codes",
            ));
        }
        if !document.is_published() {
            return Err(AppError::validation(
                "Only published documents carry QR codes",
            ));
        }

        self.effects
            .enqueue(SideEffect::GenerateQr {
                document_id,
                force: true,
            })
            .await
    }

    /// Moves a document's file back under the canonical folder for its
    /// status, if it has drifted. Returns whether a move happened.
    ///
    /// Administrative repair; used by the `fix-paths` command.
    pub async fn normalize_file_path(&self, document_id: Uuid) -> AppResult<bool> {
        let mut document = self.get_document(document_id).await?;

        let Some(old_path) = document.file_path.clone() else {
            return Ok(false);
        };
        if self.layout.is_canonical(document.status, &old_path) {
            return Ok(false);
        }

        let new_path = self.layout.document_path(
            document.status,
            Utc::now(),
            PathLayout::basename(&old_path),
        );

        self.storage.copy(&old_path, &new_path).await?;
        if !self.storage.exists(&new_path).await? {
            return Err(AppError::storage(format!(
                "Relocated file missing at destination: {new_path}"
            )));
        }

        document.file_path = Some(new_path.clone());
        document.updated_at = Utc::now();
        self.documents.update(&document).await?;

        if let Err(e) = self.storage.delete(&old_path).await {
            warn!(document_id = %document.id, path = %old_path, error = %e,
                "Failed to remove superseded file copy");
        }

        info!(document_id = %document.id, from = %old_path, to = %new_path, "File path normalized");
        Ok(true)
    }

    /// Counts of non-deleted documents per status.
    pub async fn statistics(&self) -> AppResult<DocumentStatistics> {
        let by_status = self.documents.count_by_status().await?;
        let total = by_status.iter().map(|c| c.count).sum();
        Ok(DocumentStatistics { total, by_status })
    }
}
