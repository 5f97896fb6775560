//! QR artifact generation job.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use docflow_core::result::AppResult;
use docflow_core::traits::{QrGenerator, QrRequest};
use docflow_service::DocumentService;

/// Generates and persists QR artifacts for published documents.
///
/// Idempotent: a document that already carries an artifact is skipped
/// unless regeneration was explicitly requested, so duplicate deliveries
/// are harmless.
#[derive(Debug, Clone)]
pub struct QrGenerationJob {
    service: Arc<DocumentService>,
    generator: Arc<dyn QrGenerator>,
    public_base_url: String,
}

impl QrGenerationJob {
    /// Creates a new QR generation job.
    pub fn new(
        service: Arc<DocumentService>,
        generator: Arc<dyn QrGenerator>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            service,
            generator,
            public_base_url: public_base_url.into(),
        }
    }

    /// Generate an artifact for one document.
    pub async fn run(&self, document_id: Uuid, force: bool) -> AppResult<()> {
        let document = self.service.get_document(document_id).await?;

        if !document.is_published() {
            debug!(
                document_id = %document_id,
                status = %document.status,
                "Skipping QR generation for non-published document"
            );
            return Ok(());
        }
        if document.has_qr_code() && !force {
            debug!(document_id = %document_id, "QR artifact already exists");
            return Ok(());
        }

        let request = QrRequest {
            document_id: document.id,
            document_number: document.document_number.clone(),
            validation_url: format!(
                "{}/documents/{}/verify",
                self.public_base_url.trim_end_matches('/'),
                document.id
            ),
        };

        let artifact = self.generator.generate(&request).await?;
        self.service.store_qr_artifact(document_id, artifact).await?;

        info!(
            document_id = %document_id,
            document_number = %document.document_number,
            "QR artifact generated"
        );
        Ok(())
    }
}
