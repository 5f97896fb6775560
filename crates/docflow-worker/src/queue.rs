//! In-process side-effect queue.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use docflow_core::error::AppError;
use docflow_core::result::AppResult;
use docflow_core::traits::{EffectQueue, SideEffect};

/// The enqueue half of the worker channel.
///
/// Cloneable; handed to the lifecycle engine and the document service as
/// their [`EffectQueue`]. When every sender is dropped the worker drains
/// the channel and exits.
#[derive(Debug, Clone)]
pub struct WorkerQueue {
    sender: mpsc::Sender<SideEffect>,
}

impl WorkerQueue {
    /// Create a bounded queue, returning the sender and the receiver to
    /// hand to [`SideEffectWorker`](crate::executor::SideEffectWorker).
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<SideEffect>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EffectQueue for WorkerQueue {
    async fn enqueue(&self, effect: SideEffect) -> AppResult<()> {
        debug!(?effect, "Enqueuing side effect");
        self.sender
            .send(effect)
            .await
            .map_err(|e| AppError::internal(format!("Side-effect queue closed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_enqueue_delivers_to_receiver() {
        let (queue, mut receiver) = WorkerQueue::new(4);
        queue
            .enqueue(SideEffect::GenerateQr {
                document_id: Uuid::new_v4(),
                force: false,
            })
            .await
            .unwrap();
        assert!(matches!(
            receiver.recv().await,
            Some(SideEffect::GenerateQr { .. })
        ));
    }

    #[tokio::test]
    async fn test_enqueue_fails_when_receiver_dropped() {
        let (queue, receiver) = WorkerQueue::new(4);
        drop(receiver);
        assert!(queue.enqueue(SideEffect::ArchiveExpired).await.is_err());
    }
}
