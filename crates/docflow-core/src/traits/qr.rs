//! QR artifact generation trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// The inputs a QR generator needs to render and store an artifact.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QrRequest {
    /// The document's ID.
    pub document_id: Uuid,
    /// The human-readable document number (encoded in the image).
    pub document_number: String,
    /// The public validation endpoint for the document. Implementations
    /// append their generated token as a query parameter.
    pub validation_url: String,
}

/// A generated QR artifact.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QrArtifact {
    /// Storage path of the rendered image.
    pub path: String,
    /// The verification token embedded in the validation URL.
    pub token: String,
}

/// Renders and stores a QR code image for a published document.
///
/// Image rendering is a collaborator concern; the core only invokes this
/// when a document enters `Published` without an existing artifact, or on
/// an explicit regenerate request, and persists the returned path/token.
#[async_trait]
pub trait QrGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Generate a QR artifact for the given document.
    async fn generate(&self, request: &QrRequest) -> AppResult<QrArtifact>;
}
