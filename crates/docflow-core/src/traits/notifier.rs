//! Notification delivery trait.

use async_trait::async_trait;

use crate::events::DocumentEvent;
use crate::result::AppResult;

/// Delivers transition notifications to interested parties.
///
/// Implemented by collaborators (mail, chat, in-app inboxes). Delivery is
/// fire-and-forget with at-least-once semantics: the worker logs failures
/// and never propagates them back into the committed transition.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a notification for a committed transition.
    async fn notify(&self, event: &DocumentEvent) -> AppResult<()>;
}

/// A notifier that only logs events, for single-node and test setups.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &DocumentEvent) -> AppResult<()> {
        tracing::info!(
            document_id = %event.document_id,
            document_number = %event.document_number,
            kind = ?event.kind,
            previous_status = %event.previous_status,
            new_status = %event.new_status,
            "Document transition notification"
        );
        Ok(())
    }
}
