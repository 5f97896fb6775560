//! The side-effect worker loop.

use tokio::sync::mpsc;
use tracing::{info, warn};

use docflow_core::traits::SideEffect;

use crate::jobs::{ArchiveExpiredJob, NotificationJob, QrGenerationJob};

/// Consumes side effects from the queue and dispatches them to jobs.
///
/// Runs until every [`WorkerQueue`](crate::queue::WorkerQueue) sender has
/// been dropped and the channel is drained. Job failures are logged and
/// never propagate: the originating transition has already committed.
#[derive(Debug)]
pub struct SideEffectWorker {
    receiver: mpsc::Receiver<SideEffect>,
    notification: NotificationJob,
    qr: Option<QrGenerationJob>,
    archive: ArchiveExpiredJob,
}

impl SideEffectWorker {
    /// Creates a new worker over the queue's receiver.
    ///
    /// `qr` is optional: deployments without a QR renderer simply skip
    /// generation requests.
    pub fn new(
        receiver: mpsc::Receiver<SideEffect>,
        notification: NotificationJob,
        qr: Option<QrGenerationJob>,
        archive: ArchiveExpiredJob,
    ) -> Self {
        Self {
            receiver,
            notification,
            qr,
            archive,
        }
    }

    /// Run the worker loop to completion.
    pub async fn run(mut self) {
        info!("Side-effect worker started");

        while let Some(effect) = self.receiver.recv().await {
            match effect {
                SideEffect::Notify(event) => {
                    if let Err(e) = self.notification.run(&event).await {
                        warn!(
                            document_id = %event.document_id,
                            error = %e,
                            "Notification delivery failed"
                        );
                    }
                }
                SideEffect::GenerateQr { document_id, force } => match &self.qr {
                    Some(job) => {
                        if let Err(e) = job.run(document_id, force).await {
                            warn!(
                                document_id = %document_id,
                                error = %e,
                                "QR generation failed"
                            );
                        }
                    }
                    None => {
                        warn!(
                            document_id = %document_id,
                            "QR generation requested but no generator is configured"
                        );
                    }
                },
                SideEffect::ArchiveExpired => {
                    if let Err(e) = self.archive.run().await {
                        warn!(error = %e, "Expiry sweep failed");
                    }
                }
            }
        }

        info!("Side-effect queue closed; worker exiting");
    }
}
