//! `docflow fix-paths`

use std::sync::Arc;

use anyhow::Result;

use docflow_core::config::AppConfig;
use docflow_core::traits::EffectQueue;
use docflow_core::types::pagination::PageRequest;
use docflow_database::repositories::{
    PgAccessStore, PgApprovalStore, PgDocumentStore, PgRevisionStore,
};
use docflow_database::DatabasePool;
use docflow_service::{DocumentNumberGenerator, DocumentService};
use docflow_storage::{LocalStorageProvider, PathLayout};
use docflow_worker::WorkerQueue;

/// Move document files back under their canonical status folders.
pub async fn run(config: &AppConfig) -> Result<()> {
    let pool = DatabasePool::connect(&config.database).await?;
    let documents = Arc::new(PgDocumentStore::new(pool.pool().clone()));
    let storage = Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);
    let layout = PathLayout::new(&config.storage);

    // The repair path never dispatches side effects; the receiver is
    // simply kept alive for the service's lifetime.
    let (queue, _receiver) = WorkerQueue::new(config.worker.queue_capacity);
    let queue: Arc<dyn EffectQueue> = Arc::new(queue);

    let service = DocumentService::new(
        documents.clone(),
        Arc::new(PgRevisionStore::new(pool.pool().clone())),
        Arc::new(PgApprovalStore::new(pool.pool().clone())),
        Arc::new(PgAccessStore::new(pool.pool().clone())),
        storage,
        layout,
        DocumentNumberGenerator::new(documents, config.app.company_code.clone()),
        queue,
    );

    let mut page = PageRequest::new(1, 100);
    let mut scanned = 0usize;
    let mut moved = 0usize;

    loop {
        let response = service.list_documents(&page).await?;
        let has_next = response.has_next();

        for document in response.items {
            scanned += 1;
            match service.normalize_file_path(document.id).await {
                Ok(true) => {
                    moved += 1;
                    println!("Moved {}", document.document_number);
                }
                Ok(false) => {}
                Err(e) => eprintln!("Skipped {}: {e}", document.document_number),
            }
        }

        if !has_next {
            break;
        }
        page = PageRequest::new(page.page + 1, page.page_size);
    }

    pool.close().await;
    println!("Scanned {scanned} document(s), moved {moved}.");
    Ok(())
}
