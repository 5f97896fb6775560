//! The lifecycle engine: validates and executes status transitions.
//!
//! A transition runs in four phases:
//!
//! 1. validate the target against the allowed-transition table and the
//!    per-edge preconditions, on a freshly loaded document;
//! 2. stage the file relocation when the canonical folder changes — the
//!    file is *copied* to the new path and the destination verified before
//!    anything is committed;
//! 3. commit the updated row together with exactly one audit record under
//!    an optimistic guard on `(status, updated_at)` — the loser of a race
//!    gets `ConcurrentModification` and its staged copy is removed;
//! 4. after commit, delete the superseded file copy and dispatch side
//!    effects (notification, QR generation) to the worker queue.
//!
//! No observable state ever pairs a status with a missing file: the
//! destination exists before the path is committed, and the source is only
//! removed after.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use docflow_core::error::{AppError, ErrorKind};
use docflow_core::events::{DocumentEvent, TransitionKind};
use docflow_core::result::AppResult;
use docflow_core::traits::{EffectQueue, SideEffect, StorageProvider};
use docflow_database::{DocumentStore, RevisionStore, TransitionGuard};
use docflow_entity::approval::{CreateApproval, TransitionAction};
use docflow_entity::document::{Document, DocumentStatus};

use docflow_storage::layout::{folder_for_status, PathLayout};

use crate::context::RequestContext;

/// Executes lifecycle transitions.
#[derive(Debug, Clone)]
pub struct LifecycleEngine {
    documents: Arc<dyn DocumentStore>,
    revisions: Arc<dyn RevisionStore>,
    storage: Arc<dyn StorageProvider>,
    layout: PathLayout,
    effects: Arc<dyn EffectQueue>,
}

/// A staged file relocation, not yet committed.
struct StagedRelocation {
    old_path: String,
    new_path: String,
}

impl LifecycleEngine {
    /// Creates a new lifecycle engine.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        revisions: Arc<dyn RevisionStore>,
        storage: Arc<dyn StorageProvider>,
        layout: PathLayout,
        effects: Arc<dyn EffectQueue>,
    ) -> Self {
        Self {
            documents,
            revisions,
            storage,
            layout,
            effects,
        }
    }

    /// Request a transition for a document by ID.
    pub async fn transition(
        &self,
        document_id: Uuid,
        target: DocumentStatus,
        ctx: &RequestContext,
        comment: Option<&str>,
    ) -> AppResult<Document> {
        let document = self
            .documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {document_id} not found")))?;
        self.apply(document, target, ctx, comment).await
    }

    /// Apply a transition to an already-loaded document snapshot.
    ///
    /// The snapshot's `(status, updated_at)` becomes the optimistic guard:
    /// if another transition commits first, this one fails with
    /// `ConcurrentModification` and leaves no trace.
    pub async fn apply(
        &self,
        document: Document,
        target: DocumentStatus,
        ctx: &RequestContext,
        comment: Option<&str>,
    ) -> AppResult<Document> {
        let from = document.status;

        if !from.can_transition_to(target) {
            return Err(AppError::invalid_transition(format!(
                "Document {} cannot move from {from} to {target}",
                document.document_number
            )));
        }

        check_preconditions(&document, target, ctx, comment)?;

        let action = TransitionAction::for_transition(from, target).ok_or_else(|| {
            AppError::internal(format!("No action label for transition {from} -> {target}"))
        })?;

        let now = Utc::now();
        let mut update = document.clone();
        update.status = target;
        update.updated_at = now;
        match target {
            DocumentStatus::Submitted => update.submitted_at = Some(now),
            DocumentStatus::UnderReview => {
                update.reviewed_at = Some(now);
                update.reviewer_id = Some(ctx.user_id);
            }
            DocumentStatus::Verified => update.verified_at = Some(now),
            DocumentStatus::Approved => {
                update.approved_at = Some(now);
                update.approver_id = Some(ctx.user_id);
            }
            DocumentStatus::Published => update.published_at = Some(now),
            _ => {}
        }

        let staged = match self.stage_relocation(&document, target).await {
            Ok(staged) => staged,
            Err(err) => {
                // A vanished source usually means the snapshot lost a race
                // and the winner already relocated the file. Re-read and
                // report the conflict rather than a storage fault.
                if let Ok(Some(current)) = self.documents.find_by_id(document.id).await {
                    if current.status != from || current.updated_at != document.updated_at {
                        return Err(AppError::concurrent_modification(format!(
                            "Document {} changed while the transition was in flight",
                            document.document_number
                        )));
                    }
                }
                return Err(err);
            }
        };
        if let Some(staged) = &staged {
            update.file_path = Some(staged.new_path.clone());
        }

        let revision_id = self.revisions.latest(document.id).await?.map(|r| r.id);
        let audit = CreateApproval {
            document_id: document.id,
            revision_id,
            previous_status: from,
            new_status: target,
            action,
            user_id: ctx.user_id,
            user_role: ctx.role,
            comments: comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        };
        let guard = TransitionGuard {
            expected_status: from,
            expected_updated_at: document.updated_at,
        };

        match self.documents.commit_transition(&update, guard, &audit).await {
            Ok((committed, approval)) => {
                if let Some(staged) = &staged {
                    if let Err(e) = self.storage.delete(&staged.old_path).await {
                        warn!(
                            document_id = %committed.id,
                            path = %staged.old_path,
                            error = %e,
                            "Failed to remove superseded file copy"
                        );
                    }
                }

                info!(
                    document_id = %committed.id,
                    document_number = %committed.document_number,
                    from = %from,
                    to = %target,
                    user_id = %ctx.user_id,
                    "Document transition committed"
                );

                self.dispatch_effects(&committed, from, &approval.comments, ctx)
                    .await;
                Ok(committed)
            }
            Err(err) => {
                if let Some(staged) = &staged {
                    if let Err(cleanup) = self.storage.delete(&staged.new_path).await {
                        warn!(
                            document_id = %document.id,
                            path = %staged.new_path,
                            error = %cleanup,
                            "Failed to remove staged file copy after aborted transition"
                        );
                    }
                }
                Err(err)
            }
        }
    }

    /// Copy the document's file to the canonical folder of `target` when it
    /// differs from the current one, verifying the destination before the
    /// commit may rely on it.
    async fn stage_relocation(
        &self,
        document: &Document,
        target: DocumentStatus,
    ) -> AppResult<Option<StagedRelocation>> {
        let Some(old_path) = document.file_path.as_deref() else {
            return Ok(None);
        };
        if folder_for_status(document.status) == folder_for_status(target) {
            return Ok(None);
        }

        let new_path =
            self.layout
                .document_path(target, Utc::now(), PathLayout::basename(old_path));

        self.storage.copy(old_path, &new_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!(
                    "Failed to relocate file for document {}: {old_path} -> {new_path}",
                    document.document_number
                ),
                e,
            )
        })?;

        if !self.storage.exists(&new_path).await? {
            return Err(AppError::storage(format!(
                "Relocated file missing at destination: {new_path}"
            )));
        }

        Ok(Some(StagedRelocation {
            old_path: old_path.to_string(),
            new_path,
        }))
    }

    /// Enqueue post-commit side effects. Failures are logged, never surfaced.
    async fn dispatch_effects(
        &self,
        committed: &Document,
        from: DocumentStatus,
        comment: &Option<String>,
        ctx: &RequestContext,
    ) {
        let Some(kind) = transition_kind(from, committed.status) else {
            return;
        };

        let event = DocumentEvent {
            kind,
            document_id: committed.id,
            document_number: committed.document_number.clone(),
            title: committed.title.clone(),
            previous_status: from.as_str().to_string(),
            new_status: committed.status.as_str().to_string(),
            actor_id: ctx.user_id,
            comment: comment.clone(),
            occurred_at: Utc::now(),
        };

        if let Err(e) = self.effects.enqueue(SideEffect::Notify(event)).await {
            warn!(document_id = %committed.id, error = %e, "Failed to enqueue notification");
        }

        if committed.status == DocumentStatus::Published && !committed.has_qr_code() {
            let effect = SideEffect::GenerateQr {
                document_id: committed.id,
                force: false,
            };
            if let Err(e) = self.effects.enqueue(effect).await {
                warn!(document_id = %committed.id, error = %e, "Failed to enqueue QR generation");
            }
        }
    }
}

/// The event kind for a committed edge.
fn transition_kind(from: DocumentStatus, to: DocumentStatus) -> Option<TransitionKind> {
    TransitionAction::for_transition(from, to).map(|action| match action {
        TransitionAction::Submitted => TransitionKind::Submitted,
        TransitionAction::Reviewed => TransitionKind::ReviewStarted,
        TransitionAction::RequestedRevision => TransitionKind::RevisionRequested,
        TransitionAction::Verified => TransitionKind::Verified,
        TransitionAction::Approved => TransitionKind::Approved,
        TransitionAction::Published => TransitionKind::Published,
        TransitionAction::Rejected => TransitionKind::Rejected,
        TransitionAction::Archived => TransitionKind::Archived,
        TransitionAction::Reopened => TransitionKind::Reopened,
    })
}

/// Per-edge preconditions, checked before any state is touched.
fn check_preconditions(
    document: &Document,
    target: DocumentStatus,
    ctx: &RequestContext,
    comment: Option<&str>,
) -> AppResult<()> {
    use DocumentStatus::*;

    match (document.status, target) {
        (Draft | NeedsRevision, Submitted) => {
            if ctx.user_id != document.creator_id {
                return Err(AppError::unauthorized(
                    "Only the document's creator may submit it",
                ));
            }
            if !document.has_file() {
                return Err(AppError::missing_file(
                    "A file must be attached before submission",
                ));
            }
        }
        (Submitted, UnderReview) | (UnderReview, Verified) => {
            require_review(ctx)?;
        }
        (UnderReview | Verified, NeedsRevision) => {
            require_review(ctx)?;
            require_comment(comment, "Revision notes are required")?;
        }
        (Submitted | UnderReview | Verified, Rejected) => {
            require_review(ctx)?;
            require_comment(comment, "A rejection reason is required")?;
        }
        (Verified, Approved) | (Approved, Published) | (Published, Archived) => {
            if !ctx.role.can_approve() {
                return Err(AppError::unauthorized(
                    "Approval capability is required for this action",
                ));
            }
        }
        (Rejected, Draft) => {
            if ctx.user_id != document.creator_id {
                return Err(AppError::unauthorized(
                    "Only the document's creator may reopen it",
                ));
            }
        }
        // Already validated against the transition table.
        _ => {}
    }

    Ok(())
}

fn require_review(ctx: &RequestContext) -> AppResult<()> {
    if !ctx.role.can_review() {
        return Err(AppError::unauthorized(
            "Review capability is required for this action",
        ));
    }
    Ok(())
}

fn require_comment(comment: Option<&str>, message: &str) -> AppResult<()> {
    match comment.map(str::trim) {
        Some(c) if !c.is_empty() => Ok(()),
        _ => Err(AppError::missing_comment(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_kind_covers_every_edge() {
        for from in DocumentStatus::ALL {
            for to in from.allowed_targets() {
                assert!(transition_kind(from, *to).is_some());
            }
        }
        assert_eq!(transition_kind(DocumentStatus::Draft, DocumentStatus::Published), None);
    }
}
