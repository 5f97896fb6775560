//! PostgreSQL access-record store.

use async_trait::async_trait;
use sqlx::PgPool;

use docflow_core::error::{AppError, ErrorKind};
use docflow_core::result::AppResult;
use docflow_entity::access::{AccessRecord, CreateAccessRecord, DeviceInfo};

use crate::store::AccessStore;

/// Postgres-backed implementation of [`AccessStore`].
#[derive(Debug, Clone)]
pub struct PgAccessStore {
    pool: PgPool,
}

impl PgAccessStore {
    /// Create a new access store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessStore for PgAccessStore {
    async fn append(&self, record: &CreateAccessRecord) -> AppResult<AccessRecord> {
        let device = DeviceInfo::from_user_agent(record.user_agent.as_deref());

        sqlx::query_as::<_, AccessRecord>(
            "INSERT INTO document_accesses (document_id, user_id, kind, method, device_type, \
             browser, platform, ip_address, user_agent, is_successful, error_message, \
             bytes_served) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(record.document_id)
        .bind(record.user_id)
        .bind(record.kind)
        .bind(record.method)
        .bind(&device.device_type)
        .bind(&device.browser)
        .bind(&device.platform)
        .bind(&record.ip_address)
        .bind(&record.user_agent)
        .bind(record.is_successful)
        .bind(&record.error_message)
        .bind(record.bytes_served)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append access record", e))
    }
}
