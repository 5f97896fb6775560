//! PostgreSQL revision store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docflow_core::error::{AppError, ErrorKind};
use docflow_core::result::AppResult;
use docflow_entity::revision::{CreateRevision, DocumentRevision};

use crate::store::RevisionStore;

/// Postgres-backed implementation of [`RevisionStore`].
#[derive(Debug, Clone)]
pub struct PgRevisionStore {
    pool: PgPool,
}

impl PgRevisionStore {
    /// Create a new revision store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevisionStore for PgRevisionStore {
    async fn append(&self, revision: &CreateRevision) -> AppResult<DocumentRevision> {
        sqlx::query_as::<_, DocumentRevision>(
            "INSERT INTO document_revisions (document_id, version, status, original_filename, \
             file_path, file_type, file_size, file_hash, revision_notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(revision.document_id)
        .bind(&revision.version)
        .bind(revision.status)
        .bind(&revision.original_filename)
        .bind(&revision.file_path)
        .bind(&revision.file_type)
        .bind(revision.file_size)
        .bind(&revision.file_hash)
        .bind(&revision.revision_notes)
        .bind(revision.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append revision", e))
    }

    async fn list_for_document(&self, document_id: Uuid) -> AppResult<Vec<DocumentRevision>> {
        sqlx::query_as::<_, DocumentRevision>(
            "SELECT * FROM document_revisions WHERE document_id = $1 ORDER BY created_at ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list revisions", e))
    }

    async fn latest(&self, document_id: Uuid) -> AppResult<Option<DocumentRevision>> {
        sqlx::query_as::<_, DocumentRevision>(
            "SELECT * FROM document_revisions WHERE document_id = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest revision", e))
    }
}
