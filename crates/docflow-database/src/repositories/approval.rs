//! PostgreSQL approval store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use docflow_core::error::{AppError, ErrorKind};
use docflow_core::result::AppResult;
use docflow_entity::approval::DocumentApproval;

use crate::store::ApprovalStore;

/// Postgres-backed implementation of [`ApprovalStore`].
///
/// Read-only: approval rows are written inside
/// [`PgDocumentStore::commit_transition`](crate::repositories::PgDocumentStore).
#[derive(Debug, Clone)]
pub struct PgApprovalStore {
    pool: PgPool,
}

impl PgApprovalStore {
    /// Create a new approval store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalStore for PgApprovalStore {
    async fn list_for_document(&self, document_id: Uuid) -> AppResult<Vec<DocumentApproval>> {
        sqlx::query_as::<_, DocumentApproval>(
            "SELECT * FROM document_approvals WHERE document_id = $1 ORDER BY created_at ASC",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list approvals", e))
    }
}
