//! Post-commit side-effect dispatch.

use async_trait::async_trait;
use uuid::Uuid;

use crate::events::DocumentEvent;
use crate::result::AppResult;

/// A side effect to run after a state change has committed.
///
/// Effects are at-least-once: handlers must tolerate duplicate delivery.
/// None of them may influence the already-committed transition.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum SideEffect {
    /// Fan a transition event out to the notifier.
    Notify(DocumentEvent),
    /// Generate a QR artifact for a published document.
    GenerateQr {
        /// The document to generate for.
        document_id: Uuid,
        /// Regenerate even if an artifact already exists.
        force: bool,
    },
    /// Sweep published documents past their expiry date into `Archived`.
    ArchiveExpired,
}

/// Accepts side effects for asynchronous execution.
///
/// Implemented by `docflow-worker` over an in-process queue. Enqueueing
/// must be cheap; execution happens on the worker task.
#[async_trait]
pub trait EffectQueue: Send + Sync + std::fmt::Debug + 'static {
    /// Enqueue a side effect for asynchronous execution.
    async fn enqueue(&self, effect: SideEffect) -> AppResult<()>;
}
