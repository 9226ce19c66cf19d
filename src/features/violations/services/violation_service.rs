use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::content::{ContentResolver, ContentTarget};
use crate::features::members::MemberDirectory;
use crate::features::violations::dtos::{CleanupOutcome, CreateViolationDto, ProcessViolationDto};
use crate::features::violations::models::{
    NewViolation, StatusTransition, Violation, ViolationDecision, ViolationFilter,
    ViolationStatus,
};
use crate::features::violations::services::ViolationStore;

/// Result of adjudicating a report
#[derive(Debug, Clone)]
pub struct ProcessedViolation {
    pub violation: Violation,
    pub cleanup: CleanupOutcome,
}

/// Report submission and adjudication; the only writer of violation records
pub struct ViolationService {
    store: Arc<dyn ViolationStore>,
    resolver: ContentResolver,
    members: Arc<dyn MemberDirectory>,
}

impl ViolationService {
    pub fn new(
        store: Arc<dyn ViolationStore>,
        resolver: ContentResolver,
        members: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            store,
            resolver,
            members,
        }
    }

    /// File a report against a board post or chat room.
    ///
    /// Duplicate reports by the same member are stored as separate records.
    pub async fn create_violation(
        &self,
        reporter_id: i64,
        dto: CreateViolationDto,
    ) -> Result<Violation> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let target = ContentTarget::from_parts(dto.board_id, dto.chat_room_id)?;

        if !self.members.exists(reporter_id).await? {
            return Err(AppError::NotFound(format!(
                "Member {} not found",
                reporter_id
            )));
        }

        let content = self.resolver.resolve(target).await?;

        if content.author_member_id == Some(reporter_id) {
            return Err(AppError::Validation(
                "Members cannot report their own content".to_string(),
            ));
        }

        let violation = self
            .store
            .create(NewViolation {
                reason: dto.reason,
                detail_reason: dto
                    .detail_reason
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                reporter_id,
                reported_member_id: content.author_member_id,
                target,
            })
            .await?;

        tracing::info!(
            "Violation reported: id={}, target={}, reporter={}, reported={:?}, reason={}",
            violation.id,
            violation.target,
            reporter_id,
            violation.reported_member_id,
            violation.reason
        );

        Ok(violation)
    }

    /// Adjudicate a pending report and cascade content removal if decided.
    ///
    /// The status transition is committed first. A failed removal does not undo it;
    /// it is reported as `CleanupOutcome::Failed` and left for the cleanup reconciler.
    pub async fn process_violation(
        &self,
        violation_id: i64,
        moderator_id: i64,
        dto: ProcessViolationDto,
    ) -> Result<ProcessedViolation> {
        if !dto.violated_status.is_terminal() {
            return Err(AppError::Validation(
                "violatedStatus must be VIOLATED or NORMAL".to_string(),
            ));
        }

        let decision = ViolationDecision {
            status: dto.violated_status,
            delete_content: dto.delete_content,
        };

        let existing = self.store.find_by_id(violation_id).await?;
        if existing.status != ViolationStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Violation {} was already processed as {}",
                violation_id, existing.status
            )));
        }

        let delete_requested = decision.should_delete_content();
        let violation = self
            .store
            .update_status(
                violation_id,
                StatusTransition {
                    status: decision.status,
                    processed_by: moderator_id,
                    delete_requested,
                },
            )
            .await?;

        tracing::info!(
            "Violation processed: id={}, status={}, moderator={}, delete_content={}",
            violation.id,
            violation.status,
            moderator_id,
            delete_requested
        );

        if !delete_requested {
            return Ok(ProcessedViolation {
                violation,
                cleanup: CleanupOutcome::Skipped,
            });
        }

        Ok(self.remove_content(violation).await)
    }

    async fn remove_content(&self, violation: Violation) -> ProcessedViolation {
        let content = self.resolver.reference(violation.target);
        if let Err(e) = content.delete().await {
            tracing::warn!(
                "Violation {} adjudicated but removal of {} failed: {}",
                violation.id,
                violation.target,
                e
            );
            return ProcessedViolation {
                violation,
                cleanup: CleanupOutcome::Failed {
                    reason: e.to_string(),
                },
            };
        }

        // The content is gone either way; a missed marker is picked up by the reconciler
        // and the idempotent delete makes the retry harmless.
        let violation = match self.store.mark_content_deleted(violation.id).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(
                    "Failed to record content removal for violation {}: {}",
                    violation.id,
                    e
                );
                violation
            }
        };

        ProcessedViolation {
            violation,
            cleanup: CleanupOutcome::Deleted,
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Violation> {
        self.store.find_by_id(id).await
    }

    /// Moderation queue: pending reports, newest first
    pub async fn list_pending(&self, offset: i64, limit: i64) -> Result<(Vec<Violation>, i64)> {
        self.store
            .list(&ViolationFilter::pending(), offset, limit)
            .await
    }

    pub async fn list(
        &self,
        filter: &ViolationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Violation>, i64)> {
        self.store.list(filter, offset, limit).await
    }

    pub async fn list_by_reporter(
        &self,
        reporter_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Violation>, i64)> {
        self.store
            .list(&ViolationFilter::by_reporter(reporter_id), offset, limit)
            .await
    }
}
