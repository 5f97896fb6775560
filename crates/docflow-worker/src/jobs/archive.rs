//! Expired-document archival sweep.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use docflow_core::result::AppResult;
use docflow_database::DocumentStore;
use docflow_entity::document::DocumentStatus;
use docflow_service::{LifecycleEngine, RequestContext};

/// Archives published documents whose expiry date has passed.
///
/// Each archival runs through the ordinary engine path as the system
/// actor, so sweeps are audited like manual transitions. A document that
/// changes concurrently is skipped and picked up on the next sweep.
#[derive(Debug, Clone)]
pub struct ArchiveExpiredJob {
    documents: Arc<dyn DocumentStore>,
    engine: Arc<LifecycleEngine>,
}

impl ArchiveExpiredJob {
    /// Creates a new sweep job.
    pub fn new(documents: Arc<dyn DocumentStore>, engine: Arc<LifecycleEngine>) -> Self {
        Self { documents, engine }
    }

    /// Run one sweep. Returns how many documents were archived.
    pub async fn run(&self) -> AppResult<usize> {
        let ctx = RequestContext::system();
        let expired = self
            .documents
            .find_expired_published(Utc::now().date_naive())
            .await?;

        let mut archived = 0;
        for document in expired {
            let id = document.id;
            match self
                .engine
                .apply(document, DocumentStatus::Archived, &ctx, None)
                .await
            {
                Ok(_) => archived += 1,
                Err(e) => {
                    warn!(document_id = %id, error = %e, "Expiry archival skipped");
                }
            }
        }

        if archived > 0 {
            info!(archived, "Expired documents archived");
        }
        Ok(archived)
    }
}
