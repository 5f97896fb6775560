//! Tests for document creation, numbering, file versioning, access
//! tracking, and QR token verification.

mod support;

use bytes::Bytes;
use docflow_core::error::ErrorKind;
use docflow_core::traits::{QrArtifact, StorageProvider};
use docflow_entity::access::{AccessKind, AccessMethod};
use docflow_entity::document::{DocumentPatch, DocumentStatus};
use docflow_service::document::{AttachFile, RecordAccess};
use support::Harness;

fn pdf(name: &str) -> AttachFile {
    AttachFile {
        data: Bytes::from_static(b"%PDF-1.4 content"),
        original_name: name.to_string(),
        is_major: false,
        notes: None,
    }
}

#[tokio::test]
async fn test_document_number_format_and_sequence() {
    let harness = Harness::new().await;

    let first = harness.create_draft("First").await;
    let second = harness.create_draft("Second").await;

    let now = chrono::Utc::now();
    let prefix = format!("AKM-IT-DEV-{}-{:02}-", now.format("%Y"), now.format("%m"));
    assert_eq!(first.document_number, format!("{prefix}0001"));
    assert_eq!(second.document_number, format!("{prefix}0002"));
    assert_eq!(first.status, DocumentStatus::Draft);
    assert_eq!(first.version, "1.0");
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_numbers() {
    let harness = Harness::new().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = harness.service.clone();
        let department = harness.department.clone();
        let section = harness.section.clone();
        let ctx = harness.creator.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_document(
                    docflow_entity::document::CreateDocument {
                        title: format!("Doc {i}"),
                        description: None,
                        document_type: None,
                        is_confidential: false,
                        effective_date: None,
                        expiry_date: None,
                        tags: Vec::new(),
                    },
                    &department,
                    &section,
                    &ctx,
                )
                .await
                .unwrap()
                .document_number
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        numbers.push(handle.await.unwrap());
    }
    let unique: std::collections::HashSet<_> = numbers.iter().collect();
    assert_eq!(unique.len(), numbers.len());
}

#[tokio::test]
async fn test_attach_file_versioning() {
    let harness = Harness::new().await;
    let document = harness.create_draft("Versioned").await;

    let document = harness
        .service
        .attach_file(document.id, pdf("v1.pdf"), &harness.creator)
        .await
        .unwrap();
    assert_eq!(document.version, "1.0");
    assert!(document.has_file());
    assert_eq!(document.file_type.as_deref(), Some("pdf"));
    assert!(document.file_hash.is_some());

    let document = harness
        .service
        .attach_file(document.id, pdf("v2.pdf"), &harness.creator)
        .await
        .unwrap();
    assert_eq!(document.version, "1.1");

    let document = harness
        .service
        .attach_file(
            document.id,
            AttachFile {
                is_major: true,
                notes: Some("Complete rewrite".to_string()),
                ..pdf("v3.pdf")
            },
            &harness.creator,
        )
        .await
        .unwrap();
    assert_eq!(document.version, "2.0");

    let revisions = harness.service.list_revisions(document.id).await.unwrap();
    let versions: Vec<&str> = revisions.iter().map(|r| r.version.as_str()).collect();
    assert_eq!(versions, ["1.0", "1.1", "2.0"]);
    assert!(revisions[2].is_major());
}

#[tokio::test]
async fn test_attach_file_permission_follows_status() {
    let harness = Harness::new().await;
    let document = harness.document_at(DocumentStatus::Submitted).await;

    // Submitted documents are admin territory.
    let err = harness
        .service
        .attach_file(document.id, pdf("sneaky.pdf"), &harness.creator)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    harness
        .service
        .attach_file(document.id, pdf("admin.pdf"), &harness.admin)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_metadata_rules() {
    let harness = Harness::new().await;
    let document = harness.create_draft("Updatable").await;

    let err = harness
        .service
        .update_document(
            document.id,
            DocumentPatch {
                title: Some("   ".to_string()),
                ..DocumentPatch::default()
            },
            &harness.creator,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let updated = harness
        .service
        .update_document(
            document.id,
            DocumentPatch {
                title: Some("Renamed".to_string()),
                tags: Some(vec!["iso".to_string(), "quality".to_string()]),
                is_confidential: Some(true),
                ..DocumentPatch::default()
            },
            &harness.creator,
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.tags.len(), 2);
    assert!(updated.is_confidential);

    // A plain user cannot edit someone else's draft.
    let stranger = docflow_service::RequestContext::new(
        uuid::Uuid::new_v4(),
        docflow_entity::user::UserRole::User,
        None,
        None,
        None,
    );
    let err = harness
        .service
        .update_document(
            document.id,
            DocumentPatch {
                title: Some("Hijacked".to_string()),
                ..DocumentPatch::default()
            },
            &stranger,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_soft_delete_rules() {
    let harness = Harness::new().await;

    let published = harness.document_at(DocumentStatus::Published).await;
    let err = harness
        .service
        .delete_document(published.id, &harness.superadmin)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let draft = harness.create_draft_with_file("Disposable").await;
    let path = draft.file_path.clone().unwrap();
    harness
        .service
        .delete_document(draft.id, &harness.creator)
        .await
        .unwrap();

    let err = harness.service.get_document(draft.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(!harness.storage.exists(&path).await.unwrap());
}

#[tokio::test]
async fn test_record_access_gates_guests() {
    let harness = Harness::new().await;

    let draft = harness.create_draft("Private").await;
    let err = harness
        .service
        .record_access(
            draft.id,
            RecordAccess {
                user_id: None,
                kind: AccessKind::View,
                method: AccessMethod::QrCode,
                ip_address: Some("198.51.100.7".to_string()),
                user_agent: Some("Mozilla/5.0 (iPhone; like Mac OS X)".to_string()),
                bytes_served: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    let published = harness.document_at(DocumentStatus::Published).await;
    let record = harness
        .service
        .record_access(
            published.id,
            RecordAccess {
                user_id: None,
                kind: AccessKind::View,
                method: AccessMethod::QrCode,
                ip_address: None,
                user_agent: Some("Mozilla/5.0 (iPhone; like Mac OS X)".to_string()),
                bytes_served: None,
            },
        )
        .await
        .unwrap();
    assert!(record.is_successful);
    assert_eq!(record.device_type, "mobile");

    let reloaded = harness.service.get_document(published.id).await.unwrap();
    assert_eq!(reloaded.view_count, 1);

    harness
        .service
        .record_access(
            published.id,
            RecordAccess {
                user_id: Some(harness.creator.user_id),
                kind: AccessKind::Download,
                method: AccessMethod::Web,
                ip_address: None,
                user_agent: None,
                bytes_served: Some(2048),
            },
        )
        .await
        .unwrap();
    let reloaded = harness.service.get_document(published.id).await.unwrap();
    assert_eq!(reloaded.download_count, 1);
}

#[tokio::test]
async fn test_qr_token_verification() {
    let harness = Harness::new().await;
    let published = harness.document_at(DocumentStatus::Published).await;

    // The artifact is persisted by the worker once the generator returns.
    harness
        .service
        .store_qr_artifact(
            published.id,
            QrArtifact {
                path: "qrcodes/2025/08/qr_test.png".to_string(),
                token: "sealed-token".to_string(),
            },
        )
        .await
        .unwrap();

    let verified = harness
        .service
        .verify_qr_token(published.id, "sealed-token")
        .await
        .unwrap();
    assert_eq!(verified.id, published.id);

    let err = harness
        .service
        .verify_qr_token(published.id, "forged-token")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthorized);

    // Artifacts are refused outside Published.
    let draft = harness.create_draft("No QR").await;
    let err = harness
        .service
        .store_qr_artifact(
            draft.id,
            QrArtifact {
                path: "qrcodes/2025/08/qr_draft.png".to_string(),
                token: "t".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_statistics_counts_by_status() {
    let harness = Harness::new().await;
    harness.create_draft("One").await;
    harness.create_draft("Two").await;
    harness.document_at(DocumentStatus::Published).await;

    let stats = harness.service.statistics().await.unwrap();
    assert_eq!(stats.total, 3);

    let drafts = stats
        .by_status
        .iter()
        .find(|c| c.status == DocumentStatus::Draft)
        .map(|c| c.count)
        .unwrap_or(0);
    assert_eq!(drafts, 2);
}

#[tokio::test]
async fn test_history_is_ordered_and_complete() {
    let harness = Harness::new().await;
    let document = harness.document_at(DocumentStatus::Published).await;

    let history = harness.service.get_history(document.id).await.unwrap();
    assert_eq!(history.len(), 5);
    assert!(history.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    assert_eq!(history[0].previous_status, DocumentStatus::Draft);
    assert_eq!(history.last().unwrap().new_status, DocumentStatus::Published);
    assert!(history.last().unwrap().is_progression());
}
