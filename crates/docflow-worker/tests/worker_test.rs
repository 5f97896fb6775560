//! Tests for the side-effect worker: QR generation idempotency, the
//! expiry sweep, and the worker loop itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use docflow_core::config::StorageConfig;
use docflow_core::events::{DocumentEvent, TransitionKind};
use docflow_core::result::AppResult;
use docflow_core::traits::{
    EffectQueue, Notifier, QrArtifact, QrGenerator, QrRequest, SideEffect, StorageProvider,
};
use docflow_database::{DocumentStore, MemoryStore};
use docflow_entity::document::{Document, DocumentStatus};
use docflow_service::{DocumentNumberGenerator, DocumentService, LifecycleEngine};
use docflow_storage::{LocalStorageProvider, PathLayout};
use docflow_worker::jobs::{ArchiveExpiredJob, NotificationJob, QrGenerationJob};
use docflow_worker::{SideEffectWorker, WorkerQueue};

#[derive(Debug, Default)]
struct CountingNotifier {
    delivered: AtomicUsize,
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, _event: &DocumentEvent) -> AppResult<()> {
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Discards effects; used where a job must not hold a live queue sender.
#[derive(Debug, Default)]
struct NullQueue;

#[async_trait]
impl EffectQueue for NullQueue {
    async fn enqueue(&self, _effect: SideEffect) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CountingQrGenerator {
    generated: AtomicUsize,
}

#[async_trait]
impl QrGenerator for CountingQrGenerator {
    async fn generate(&self, request: &QrRequest) -> AppResult<QrArtifact> {
        self.generated.fetch_add(1, Ordering::SeqCst);
        Ok(QrArtifact {
            path: format!("qrcodes/2025/08/qr_{}.png", request.document_id),
            token: format!("tok-{}", request.document_id),
        })
    }
}

struct Rig {
    store: MemoryStore,
    service: Arc<DocumentService>,
    engine: Arc<LifecycleEngine>,
    queue: Arc<WorkerQueue>,
    receiver: Option<tokio::sync::mpsc::Receiver<SideEffect>>,
    _tmp: tempfile::TempDir,
}

async fn rig() -> Rig {
    let tmp = tempfile::tempdir().unwrap();
    let store = MemoryStore::new();
    let storage = Arc::new(
        LocalStorageProvider::new(tmp.path().to_str().unwrap())
            .await
            .unwrap(),
    );
    let layout = PathLayout::new(&StorageConfig::default());
    let (queue, receiver) = WorkerQueue::new(64);
    let queue = Arc::new(queue);

    let documents: Arc<dyn docflow_database::DocumentStore> = Arc::new(store.clone());
    let revisions: Arc<dyn docflow_database::RevisionStore> = Arc::new(store.clone());

    let service = Arc::new(DocumentService::new(
        Arc::clone(&documents),
        Arc::clone(&revisions),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        storage.clone() as Arc<dyn StorageProvider>,
        layout.clone(),
        DocumentNumberGenerator::new(Arc::clone(&documents), "AKM"),
        queue.clone() as Arc<dyn EffectQueue>,
    ));

    let engine = Arc::new(LifecycleEngine::new(
        documents,
        revisions,
        storage as Arc<dyn StorageProvider>,
        layout,
        queue.clone() as Arc<dyn EffectQueue>,
    ));

    Rig {
        store,
        service,
        engine,
        queue,
        receiver: Some(receiver),
        _tmp: tmp,
    }
}

fn published_document(expired: bool) -> Document {
    let now = Utc::now();
    let id = Uuid::new_v4();
    Document {
        id,
        document_number: format!("AKM-IT-DEV-2025-08-{}", &id.simple().to_string()[..8]),
        title: "Published".to_string(),
        description: None,
        document_type: "general".to_string(),
        status: DocumentStatus::Published,
        version: "1.0".to_string(),
        original_filename: None,
        file_path: None,
        file_type: None,
        file_size: None,
        file_hash: None,
        qr_code_path: None,
        qr_code_token: None,
        is_confidential: false,
        effective_date: None,
        expiry_date: Some(
            (now + if expired {
                -Duration::days(30)
            } else {
                Duration::days(30)
            })
            .date_naive(),
        ),
        tags: Vec::new(),
        department_id: Uuid::new_v4(),
        section_id: Uuid::new_v4(),
        creator_id: Uuid::new_v4(),
        reviewer_id: None,
        approver_id: None,
        view_count: 0,
        download_count: 0,
        submitted_at: None,
        reviewed_at: None,
        verified_at: None,
        approved_at: None,
        published_at: Some(now),
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

#[tokio::test]
async fn test_qr_generation_is_idempotent() {
    let rig = rig().await;
    let document = published_document(false);
    rig.store.insert(&document).await.unwrap();

    let generator = Arc::new(CountingQrGenerator::default());
    let job = QrGenerationJob::new(
        rig.service.clone(),
        generator.clone(),
        "https://docs.example.com",
    );

    job.run(document.id, false).await.unwrap();
    let stored = rig.store.find_by_id(document.id).await.unwrap().unwrap();
    assert!(stored.has_qr_code());
    assert_eq!(
        stored.qr_code_token.as_deref(),
        Some(format!("tok-{}", document.id).as_str())
    );

    // A duplicate delivery must not regenerate.
    job.run(document.id, false).await.unwrap();
    assert_eq!(generator.generated.load(Ordering::SeqCst), 1);

    // An explicit regenerate request must.
    job.run(document.id, true).await.unwrap();
    assert_eq!(generator.generated.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_qr_generation_skips_non_published() {
    let rig = rig().await;
    let mut document = published_document(false);
    document.status = DocumentStatus::Draft;
    document.published_at = None;
    rig.store.insert(&document).await.unwrap();

    let generator = Arc::new(CountingQrGenerator::default());
    let job = QrGenerationJob::new(rig.service.clone(), generator.clone(), "https://x");

    job.run(document.id, false).await.unwrap();
    assert_eq!(generator.generated.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expiry_sweep_archives_only_expired() {
    let rig = rig().await;
    let expired = published_document(true);
    let current = published_document(false);
    rig.store.insert(&expired).await.unwrap();
    rig.store.insert(&current).await.unwrap();

    let documents: Arc<dyn DocumentStore> = Arc::new(rig.store.clone());
    let job = ArchiveExpiredJob::new(documents, rig.engine.clone());

    let archived = job.run().await.unwrap();
    assert_eq!(archived, 1);

    let expired = rig.store.find_by_id(expired.id).await.unwrap().unwrap();
    assert_eq!(expired.status, DocumentStatus::Archived);
    let current = rig.store.find_by_id(current.id).await.unwrap().unwrap();
    assert_eq!(current.status, DocumentStatus::Published);

    // The sweep is audited like any transition, under the system actor.
    use docflow_database::ApprovalStore;
    let history = rig.store.list_for_document(expired.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, docflow_service::context::SYSTEM_USER_ID);
}

#[tokio::test]
async fn test_worker_loop_delivers_notifications() {
    let mut rig = rig().await;
    let receiver = rig.receiver.take().unwrap();

    // The worker's own archive job must not hold a live sender, or the
    // queue could never close; its engine gets a null queue instead.
    let documents: Arc<dyn DocumentStore> = Arc::new(rig.store.clone());
    let revisions: Arc<dyn docflow_database::RevisionStore> = Arc::new(rig.store.clone());
    let storage = Arc::new(
        LocalStorageProvider::new(rig._tmp.path().to_str().unwrap())
            .await
            .unwrap(),
    );
    let sweep_engine = Arc::new(LifecycleEngine::new(
        Arc::clone(&documents),
        revisions,
        storage as Arc<dyn StorageProvider>,
        PathLayout::new(&StorageConfig::default()),
        Arc::new(NullQueue),
    ));

    let notifier = Arc::new(CountingNotifier::default());
    let worker = SideEffectWorker::new(
        receiver,
        NotificationJob::new(notifier.clone()),
        None,
        ArchiveExpiredJob::new(documents, sweep_engine),
    );
    let handle = tokio::spawn(worker.run());

    let event = DocumentEvent {
        kind: TransitionKind::Submitted,
        document_id: Uuid::new_v4(),
        document_number: "AKM-IT-DEV-2025-08-0001".to_string(),
        title: "Queued".to_string(),
        previous_status: "draft".to_string(),
        new_status: "submitted".to_string(),
        actor_id: Uuid::new_v4(),
        comment: None,
        occurred_at: Utc::now(),
    };
    rig.queue
        .enqueue(SideEffect::Notify(event.clone()))
        .await
        .unwrap();
    rig.queue.enqueue(SideEffect::Notify(event)).await.unwrap();

    // Dropping every sender closes the queue and lets the worker drain.
    let Rig {
        store: _store,
        service,
        engine,
        queue,
        receiver: _,
        _tmp,
    } = rig;
    drop(service);
    drop(engine);
    drop(queue);

    handle.await.unwrap();
    assert_eq!(notifier.delivered.load(Ordering::SeqCst), 2);
}
