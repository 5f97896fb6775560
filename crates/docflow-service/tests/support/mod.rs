//! Shared harness for service-level tests: memory stores, a tempdir-backed
//! local provider, and a recording effect queue.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use docflow_core::result::AppResult;
use docflow_core::traits::{EffectQueue, SideEffect, StorageProvider};
use docflow_database::MemoryStore;
use docflow_entity::department::{Department, Section};
use docflow_entity::document::{CreateDocument, Document, DocumentStatus};
use docflow_entity::user::UserRole;
use docflow_service::{
    document::AttachFile, DocumentNumberGenerator, DocumentService, LifecycleEngine,
    RequestContext,
};
use docflow_storage::{LocalStorageProvider, PathLayout};

/// Records enqueued side effects instead of executing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingQueue {
    pub effects: Arc<Mutex<Vec<SideEffect>>>,
}

#[async_trait]
impl EffectQueue for RecordingQueue {
    async fn enqueue(&self, effect: SideEffect) -> AppResult<()> {
        self.effects.lock().await.push(effect);
        Ok(())
    }
}

impl RecordingQueue {
    pub async fn snapshot(&self) -> Vec<SideEffect> {
        self.effects.lock().await.clone()
    }
}

pub struct Harness {
    pub store: MemoryStore,
    pub storage: Arc<LocalStorageProvider>,
    pub layout: PathLayout,
    pub service: DocumentService,
    pub engine: LifecycleEngine,
    pub queue: RecordingQueue,
    pub department: Department,
    pub section: Section,
    pub creator: RequestContext,
    pub admin: RequestContext,
    pub superadmin: RequestContext,
    _tmp: tempfile::TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let storage = Arc::new(
            LocalStorageProvider::new(tmp.path().to_str().unwrap())
                .await
                .unwrap(),
        );
        let storage_config = docflow_core::config::StorageConfig::default();
        let layout = PathLayout::new(&storage_config);
        let queue = RecordingQueue::default();

        let documents: Arc<dyn docflow_database::DocumentStore> = Arc::new(store.clone());
        let revisions: Arc<dyn docflow_database::RevisionStore> = Arc::new(store.clone());
        let approvals: Arc<dyn docflow_database::ApprovalStore> = Arc::new(store.clone());
        let accesses: Arc<dyn docflow_database::AccessStore> = Arc::new(store.clone());

        let service = DocumentService::new(
            Arc::clone(&documents),
            Arc::clone(&revisions),
            approvals,
            accesses,
            storage.clone() as Arc<dyn StorageProvider>,
            layout.clone(),
            DocumentNumberGenerator::new(Arc::clone(&documents), "AKM"),
            Arc::new(queue.clone()),
        );

        let engine = LifecycleEngine::new(
            documents,
            revisions,
            storage.clone() as Arc<dyn StorageProvider>,
            layout.clone(),
            Arc::new(queue.clone()),
        );

        let department = Department {
            id: Uuid::new_v4(),
            code: "IT".to_string(),
            name: "Information Technology".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        let section = Section {
            id: Uuid::new_v4(),
            department_id: department.id,
            code: "DEV".to_string(),
            name: "Development".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        let creator = RequestContext::new(
            Uuid::new_v4(),
            UserRole::User,
            Some(department.id),
            Some("203.0.113.10".to_string()),
            Some("integration-tests".to_string()),
        );
        let admin = RequestContext::new(
            Uuid::new_v4(),
            UserRole::Admin,
            Some(department.id),
            None,
            None,
        );
        let superadmin =
            RequestContext::new(Uuid::new_v4(), UserRole::SuperAdmin, None, None, None);

        Self {
            store,
            storage,
            layout,
            service,
            engine,
            queue,
            department,
            section,
            creator,
            admin,
            superadmin,
            _tmp: tmp,
        }
    }

    /// Create a draft through the service.
    pub async fn create_draft(&self, title: &str) -> Document {
        self.service
            .create_document(
                CreateDocument {
                    title: title.to_string(),
                    description: None,
                    document_type: None,
                    is_confidential: false,
                    effective_date: None,
                    expiry_date: None,
                    tags: Vec::new(),
                },
                &self.department,
                &self.section,
                &self.creator,
            )
            .await
            .unwrap()
    }

    /// Create a draft and attach a small PDF.
    pub async fn create_draft_with_file(&self, title: &str) -> Document {
        let document = self.create_draft(title).await;
        self.service
            .attach_file(
                document.id,
                AttachFile {
                    data: Bytes::from_static(b"%PDF-1.4 test content"),
                    original_name: "manual.pdf".to_string(),
                    is_major: false,
                    notes: None,
                },
                &self.creator,
            )
            .await
            .unwrap()
    }

    /// Insert a document directly into the store at an arbitrary status,
    /// bypassing the engine. For matrix and precondition tests.
    pub async fn insert_at_status(&self, status: DocumentStatus, with_file: bool) -> Document {
        use docflow_database::DocumentStore;

        let now = Utc::now();
        let id = Uuid::new_v4();
        let file = if with_file {
            let path = format!("documents/drafts/2025/08/{id}.pdf");
            self.storage
                .write(&path, Bytes::from_static(b"content"))
                .await
                .unwrap();
            Some(path)
        } else {
            None
        };

        let document = Document {
            id,
            document_number: format!("AKM-IT-DEV-2025-08-{}", &id.simple().to_string()[..8]),
            title: "Seeded".to_string(),
            description: None,
            document_type: "general".to_string(),
            status,
            version: "1.0".to_string(),
            original_filename: file.as_ref().map(|_| "seeded.pdf".to_string()),
            file_path: file,
            file_type: None,
            file_size: None,
            file_hash: None,
            qr_code_path: None,
            qr_code_token: None,
            is_confidential: false,
            effective_date: None,
            expiry_date: None,
            tags: Vec::new(),
            department_id: self.department.id,
            section_id: self.section.id,
            creator_id: self.creator.user_id,
            reviewer_id: None,
            approver_id: None,
            view_count: 0,
            download_count: 0,
            submitted_at: None,
            reviewed_at: None,
            verified_at: None,
            approved_at: None,
            published_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.store.insert(&document).await.unwrap()
    }

    /// Walk a freshly created document to the given status through the
    /// engine, attaching a file on the way.
    pub async fn document_at(&self, target: DocumentStatus) -> Document {
        use DocumentStatus::*;

        let mut document = self.create_draft_with_file("Walked").await;
        let path: &[(DocumentStatus, &RequestContext, Option<&str>)] = match target {
            Draft => &[],
            Submitted => &[(Submitted, &self.creator, None)],
            UnderReview => &[
                (Submitted, &self.creator, None),
                (UnderReview, &self.admin, None),
            ],
            Verified => &[
                (Submitted, &self.creator, None),
                (UnderReview, &self.admin, None),
                (Verified, &self.admin, None),
            ],
            Approved => &[
                (Submitted, &self.creator, None),
                (UnderReview, &self.admin, None),
                (Verified, &self.admin, None),
                (Approved, &self.superadmin, None),
            ],
            Published => &[
                (Submitted, &self.creator, None),
                (UnderReview, &self.admin, None),
                (Verified, &self.admin, None),
                (Approved, &self.superadmin, None),
                (Published, &self.superadmin, None),
            ],
            _ => panic!("unsupported walk target"),
        };

        for (status, ctx, comment) in path {
            document = self
                .engine
                .transition(document.id, *status, ctx, *comment)
                .await
                .unwrap();
        }
        document
    }
}
