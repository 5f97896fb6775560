//! `docflow cleanup-expired`

use std::sync::Arc;

use anyhow::Result;

use docflow_core::config::AppConfig;
use docflow_core::traits::notifier::LogNotifier;
use docflow_core::traits::{EffectQueue, SideEffect};
use docflow_database::repositories::{PgDocumentStore, PgRevisionStore};
use docflow_database::{DatabasePool, DocumentStore, RevisionStore};
use docflow_service::LifecycleEngine;
use docflow_storage::{LocalStorageProvider, PathLayout};
use docflow_worker::jobs::{ArchiveExpiredJob, NotificationJob};
use docflow_worker::WorkerQueue;

/// Archive published documents past their expiry date.
///
/// One-shot variant of the scheduled sweep: runs the sweep through the
/// engine, then drains the queued notifications inline.
pub async fn run(config: &AppConfig) -> Result<()> {
    let pool = DatabasePool::connect(&config.database).await?;
    let documents: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool.pool().clone()));
    let revisions: Arc<dyn RevisionStore> = Arc::new(PgRevisionStore::new(pool.pool().clone()));
    let storage = Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);
    let layout = PathLayout::new(&config.storage);

    let (queue, mut receiver) = WorkerQueue::new(config.worker.queue_capacity);
    let queue: Arc<dyn EffectQueue> = Arc::new(queue);

    let engine = Arc::new(LifecycleEngine::new(
        Arc::clone(&documents),
        revisions,
        storage,
        layout,
        queue,
    ));

    let job = ArchiveExpiredJob::new(Arc::clone(&documents), engine);
    let archived = job.run().await?;
    drop(job);

    // Deliver the notifications the sweep enqueued.
    let notification = NotificationJob::new(Arc::new(LogNotifier));
    receiver.close();
    while let Some(effect) = receiver.recv().await {
        if let SideEffect::Notify(event) = effect {
            notification.run(&event).await?;
        }
    }

    pool.close().await;
    println!("Archived {archived} expired document(s).");
    Ok(())
}
