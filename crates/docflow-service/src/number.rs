//! Document number generation.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tracing::error;

use docflow_database::DocumentStore;
use docflow_entity::department::{Department, Section};
use docflow_entity::document::{fallback_document_number, format_document_number};

/// Allocates document numbers from the per-bucket database counter.
///
/// Allocation failures fall back to a synthetic `AUTO-` number instead of
/// blocking creation; the failure is logged for operators.
#[derive(Debug, Clone)]
pub struct DocumentNumberGenerator {
    documents: Arc<dyn DocumentStore>,
    company_code: String,
}

impl DocumentNumberGenerator {
    /// Creates a new generator.
    pub fn new(documents: Arc<dyn DocumentStore>, company_code: impl Into<String>) -> Self {
        Self {
            documents,
            company_code: company_code.into(),
        }
    }

    /// Generate the next number for a department/section at a point in time.
    pub async fn generate(
        &self,
        department: &Department,
        section: &Section,
        at: DateTime<Utc>,
    ) -> String {
        match self
            .documents
            .next_sequence(department.id, section.id, at.year(), at.month())
            .await
        {
            Ok(sequence) => format_document_number(
                &self.company_code,
                &department.code,
                &section.code,
                at.year(),
                at.month(),
                sequence,
            ),
            Err(e) => {
                error!(
                    department = %department.code,
                    section = %section.code,
                    error = %e,
                    "Document number allocation failed, falling back to synthetic number"
                );
                fallback_document_number(at)
            }
        }
    }
}
