//! PostgreSQL document store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use docflow_core::error::{AppError, ErrorKind};
use docflow_core::result::AppResult;
use docflow_core::types::pagination::{PageRequest, PageResponse};
use docflow_entity::access::AccessKind;
use docflow_entity::approval::{CreateApproval, DocumentApproval};
use docflow_entity::document::{Document, DocumentStatus};

use crate::store::{DocumentStore, StatusCount, TransitionGuard};

/// Postgres-backed implementation of [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a new document store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, document: &Document) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (id, document_number, title, description, document_type, \
             status, version, original_filename, file_path, file_type, file_size, file_hash, \
             qr_code_path, qr_code_token, is_confidential, effective_date, expiry_date, tags, \
             department_id, section_id, creator_id, reviewer_id, approver_id, view_count, \
             download_count, submitted_at, reviewed_at, verified_at, approved_at, published_at, \
             created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32, $33) \
             RETURNING *",
        )
        .bind(document.id)
        .bind(&document.document_number)
        .bind(&document.title)
        .bind(&document.description)
        .bind(&document.document_type)
        .bind(document.status)
        .bind(&document.version)
        .bind(&document.original_filename)
        .bind(&document.file_path)
        .bind(&document.file_type)
        .bind(document.file_size)
        .bind(&document.file_hash)
        .bind(&document.qr_code_path)
        .bind(&document.qr_code_token)
        .bind(document.is_confidential)
        .bind(document.effective_date)
        .bind(document.expiry_date)
        .bind(&document.tags)
        .bind(document.department_id)
        .bind(document.section_id)
        .bind(document.creator_id)
        .bind(document.reviewer_id)
        .bind(document.approver_id)
        .bind(document.view_count)
        .bind(document.download_count)
        .bind(document.submitted_at)
        .bind(document.reviewed_at)
        .bind(document.verified_at)
        .bind(document.approved_at)
        .bind(document.published_at)
        .bind(document.created_at)
        .bind(document.updated_at)
        .bind(document.deleted_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("documents_document_number_key") =>
            {
                AppError::conflict(format!(
                    "Document number '{}' already exists",
                    document.document_number
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert document", e),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find document"))
    }

    async fn find_by_number(&self, number: &str) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE document_number = $1 AND deleted_at IS NULL",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find document by number"))
    }

    async fn update(&self, document: &Document) -> AppResult<Document> {
        sqlx::query_as::<_, Document>(
            "UPDATE documents SET title = $2, description = $3, document_type = $4, \
             version = $5, original_filename = $6, file_path = $7, file_type = $8, \
             file_size = $9, file_hash = $10, qr_code_path = $11, qr_code_token = $12, \
             is_confidential = $13, effective_date = $14, expiry_date = $15, tags = $16, \
             updated_at = $17 \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(document.id)
        .bind(&document.title)
        .bind(&document.description)
        .bind(&document.document_type)
        .bind(&document.version)
        .bind(&document.original_filename)
        .bind(&document.file_path)
        .bind(&document.file_type)
        .bind(document.file_size)
        .bind(&document.file_hash)
        .bind(&document.qr_code_path)
        .bind(&document.qr_code_token)
        .bind(document.is_confidential)
        .bind(document.effective_date)
        .bind(document.expiry_date)
        .bind(&document.tags)
        .bind(document.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update document"))?
        .ok_or_else(|| AppError::not_found(format!("Document {} not found", document.id)))
    }

    async fn commit_transition(
        &self,
        update: &Document,
        guard: TransitionGuard,
        audit: &CreateApproval,
    ) -> AppResult<(Document, DocumentApproval)> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let committed = sqlx::query_as::<_, Document>(
            "UPDATE documents SET status = $2, file_path = $3, reviewer_id = $4, \
             approver_id = $5, submitted_at = $6, reviewed_at = $7, verified_at = $8, \
             approved_at = $9, published_at = $10, updated_at = $11 \
             WHERE id = $1 AND status = $12 AND updated_at = $13 AND deleted_at IS NULL \
             RETURNING *",
        )
        .bind(update.id)
        .bind(update.status)
        .bind(&update.file_path)
        .bind(update.reviewer_id)
        .bind(update.approver_id)
        .bind(update.submitted_at)
        .bind(update.reviewed_at)
        .bind(update.verified_at)
        .bind(update.approved_at)
        .bind(update.published_at)
        .bind(update.updated_at)
        .bind(guard.expected_status)
        .bind(guard.expected_updated_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to commit transition"))?
        .ok_or_else(|| {
            AppError::concurrent_modification(format!(
                "Document {} changed while the transition was in flight",
                update.id
            ))
        })?;

        let approval = sqlx::query_as::<_, DocumentApproval>(
            "INSERT INTO document_approvals (document_id, revision_id, previous_status, \
             new_status, action, user_id, user_role, comments, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(audit.document_id)
        .bind(audit.revision_id)
        .bind(audit.previous_status)
        .bind(audit.new_status)
        .bind(audit.action)
        .bind(audit.user_id)
        .bind(audit.user_role)
        .bind(&audit.comments)
        .bind(&audit.ip_address)
        .bind(&audit.user_agent)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to append approval record"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok((committed, approval))
    }

    async fn next_sequence(
        &self,
        department_id: Uuid,
        section_id: Uuid,
        year: i32,
        month: u32,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO document_sequences (department_id, section_id, year, month, value) \
             VALUES ($1, $2, $3, $4, 1) \
             ON CONFLICT (department_id, section_id, year, month) \
             DO UPDATE SET value = document_sequences.value + 1 \
             RETURNING value",
        )
        .bind(department_id)
        .bind(section_id)
        .bind(year)
        .bind(month as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to allocate document sequence"))
    }

    async fn increment_access_counter(&self, id: Uuid, kind: AccessKind) -> AppResult<()> {
        let sql = match kind {
            AccessKind::View => {
                "UPDATE documents SET view_count = view_count + 1 WHERE id = $1"
            }
            AccessKind::Download => {
                "UPDATE documents SET download_count = download_count + 1 WHERE id = $1"
            }
        };
        sqlx::query(sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to increment access counter"))?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET deleted_at = $2, updated_at = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to soft-delete document"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Document {id} not found")));
        }
        Ok(())
    }

    async fn list_page(&self, page: &PageRequest) -> AppResult<PageResponse<Document>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err("Failed to count documents"))?;

        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE deleted_at IS NULL \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list documents"))?;

        Ok(PageResponse::new(
            documents,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn find_expired_published(&self, as_of: NaiveDate) -> AppResult<Vec<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE status = $1 AND deleted_at IS NULL \
             AND expiry_date IS NOT NULL AND expiry_date < $2",
        )
        .bind(DocumentStatus::Published)
        .bind(as_of)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to find expired documents"))
    }

    async fn count_by_status(&self) -> AppResult<Vec<StatusCount>> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM documents \
             WHERE deleted_at IS NULL GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to count documents by status"))
    }
}
