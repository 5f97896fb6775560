//! Notification fan-out job.

use std::sync::Arc;

use tracing::debug;

use docflow_core::events::DocumentEvent;
use docflow_core::result::AppResult;
use docflow_core::traits::Notifier;

/// Delivers transition events to the notifier collaborator.
#[derive(Debug, Clone)]
pub struct NotificationJob {
    notifier: Arc<dyn Notifier>,
}

impl NotificationJob {
    /// Creates a new notification job.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Deliver one event. At-least-once; duplicates are acceptable.
    pub async fn run(&self, event: &DocumentEvent) -> AppResult<()> {
        debug!(
            document_id = %event.document_id,
            kind = ?event.kind,
            "Delivering transition notification"
        );
        self.notifier.notify(event).await
    }
}
