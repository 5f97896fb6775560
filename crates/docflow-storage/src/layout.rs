//! Canonical storage layout.
//!
//! Every status maps to exactly one folder; a document's file must reside
//! under that folder for its current status. The relocation step of the
//! lifecycle engine and the `fix-paths` command both derive their target
//! paths from here.

use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use docflow_core::config::StorageConfig;
use docflow_entity::document::DocumentStatus;

/// The canonical folder for a status.
pub fn folder_for_status(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Draft | DocumentStatus::NeedsRevision => "drafts",
        DocumentStatus::Submitted | DocumentStatus::UnderReview => "submitted",
        DocumentStatus::Verified => "verified",
        DocumentStatus::Approved => "approved",
        DocumentStatus::Published => "published",
        DocumentStatus::Rejected => "rejected",
        DocumentStatus::Archived => "archived",
    }
}

/// Builds storage paths under the configured prefixes.
#[derive(Debug, Clone)]
pub struct PathLayout {
    documents_prefix: String,
    qrcodes_prefix: String,
}

impl PathLayout {
    /// Create a layout from storage configuration.
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            documents_prefix: config.documents_prefix.trim_matches('/').to_string(),
            qrcodes_prefix: config.qrcodes_prefix.trim_matches('/').to_string(),
        }
    }

    /// The stored basename for a document file: a fresh UUID plus the
    /// original extension, so uploads can never collide or traverse paths.
    pub fn stored_filename(original_name: &str) -> String {
        let ext = original_name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != original_name && !ext.is_empty())
            .map(|ext| ext.to_lowercase());
        match ext {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        }
    }

    /// Path for a document file in the canonical folder of `status`.
    pub fn document_path(
        &self,
        status: DocumentStatus,
        at: DateTime<Utc>,
        stored_filename: &str,
    ) -> String {
        format!(
            "{}/{}/{}/{:02}/{stored_filename}",
            self.documents_prefix,
            folder_for_status(status),
            at.year(),
            at.month(),
        )
    }

    /// Path for a QR artifact image.
    pub fn qr_code_path(&self, document_id: Uuid, at: DateTime<Utc>) -> String {
        format!(
            "{}/{}/{:02}/qr_{document_id}.png",
            self.qrcodes_prefix,
            at.year(),
            at.month(),
        )
    }

    /// The basename of a stored path.
    pub fn basename(path: &str) -> &str {
        path.rsplit('/').next().unwrap_or(path)
    }

    /// Whether `path` already lies under the canonical folder for `status`.
    pub fn is_canonical(&self, status: DocumentStatus, path: &str) -> bool {
        path.strip_prefix(&self.documents_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.split('/').next())
            .is_some_and(|folder| folder == folder_for_status(status))
    }
}
