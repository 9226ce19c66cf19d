use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::core::config::ModerationConfig;
use crate::core::error::{AppError, Result};
use crate::features::content::ContentResolver;
use crate::features::violations::models::Violation;
use crate::features::violations::services::ViolationStore;

/// Background worker that finishes content removals left behind by adjudications.
///
/// A removal can fail after the decision is committed; those records keep
/// `delete_requested` set without `content_deleted_at` until this worker catches up.
pub struct CleanupReconciler {
    store: Arc<dyn ViolationStore>,
    resolver: ContentResolver,
    interval: Duration,
    batch_size: i64,
}

impl CleanupReconciler {
    pub fn new(
        store: Arc<dyn ViolationStore>,
        resolver: ContentResolver,
        config: &ModerationConfig,
    ) -> Self {
        Self {
            store,
            resolver,
            interval: config.cleanup_interval,
            batch_size: config.cleanup_batch_size,
        }
    }

    /// Run the reconciler in a background loop
    pub async fn run(&self) {
        tracing::info!(
            "Starting cleanup reconciler (interval={:?}, batch_size={})",
            self.interval,
            self.batch_size
        );

        let mut interval = interval(self.interval);

        loop {
            interval.tick().await;

            match self.reconcile_batch().await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Cleanup reconciler removed content for {} violations", n),
                Err(e) => tracing::error!("Error reconciling violation cleanup: {:?}", e),
            }
        }
    }

    /// One pass over adjudicated records awaiting removal. Returns how many were settled.
    pub async fn reconcile_batch(&self) -> Result<usize> {
        let pending = self.store.list_cleanup_pending(self.batch_size).await?;

        if pending.is_empty() {
            return Ok(0);
        }

        tracing::debug!("Reconciling {} violations awaiting cleanup", pending.len());

        let mut settled = 0;
        for violation in pending {
            match self.reconcile_one(&violation).await {
                Ok(()) => settled += 1,
                Err(e) => tracing::warn!(
                    "Cleanup of {} for violation {} failed again: {}",
                    violation.target,
                    violation.id,
                    e
                ),
            }
        }

        Ok(settled)
    }

    async fn reconcile_one(&self, violation: &Violation) -> Result<()> {
        match self.resolver.reference(violation.target).delete().await {
            Ok(()) => {}
            // Nothing left to remove; stop retrying
            Err(AppError::NotFound(_)) => {
                tracing::warn!(
                    "Content {} for violation {} no longer exists",
                    violation.target,
                    violation.id
                );
            }
            Err(e) => return Err(e),
        }

        self.store.mark_content_deleted(violation.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::content::ContentTarget;
    use crate::features::violations::dtos::{
        CleanupOutcome, CreateViolationDto, ProcessViolationDto,
    };
    use crate::features::violations::models::{ViolationReason, ViolationStatus};
    use crate::features::violations::services::ViolationService;
    use crate::shared::test_helpers::{
        InMemoryContentSource, InMemoryMemberDirectory, InMemoryViolationStore,
    };

    struct Fixture {
        service: ViolationService,
        reconciler: CleanupReconciler,
        store: Arc<InMemoryViolationStore>,
        boards: Arc<InMemoryContentSource>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryViolationStore::new());
        let boards = Arc::new(InMemoryContentSource::new());
        let chat_rooms = Arc::new(InMemoryContentSource::new());
        boards.insert(42, Some(9));
        boards.insert(43, Some(9));

        let resolver = ContentResolver::new(boards.clone(), chat_rooms);
        let service = ViolationService::new(
            store.clone(),
            resolver.clone(),
            Arc::new(InMemoryMemberDirectory::with_members([1, 7, 9])),
        );
        let reconciler = CleanupReconciler::new(
            store.clone(),
            resolver,
            &ModerationConfig {
                cleanup_interval: Duration::from_secs(1),
                cleanup_batch_size: 10,
                cleanup_enabled: true,
            },
        );

        Fixture {
            service,
            reconciler,
            store,
            boards,
        }
    }

    async fn adjudicate_with_failed_cleanup(f: &Fixture, board_id: i64) -> i64 {
        let created = f
            .service
            .create_violation(
                7,
                CreateViolationDto {
                    board_id: Some(board_id),
                    chat_room_id: None,
                    reason: ViolationReason::Spam,
                    detail_reason: None,
                },
            )
            .await
            .unwrap();

        f.boards.fail_deletes(true);
        let processed = f
            .service
            .process_violation(
                created.id,
                1,
                ProcessViolationDto {
                    violated_status: ViolationStatus::Violated,
                    delete_content: None,
                },
            )
            .await
            .unwrap();
        f.boards.fail_deletes(false);

        assert!(matches!(processed.cleanup, CleanupOutcome::Failed { .. }));
        created.id
    }

    #[tokio::test]
    async fn test_reconcile_removes_content_left_behind() {
        let f = fixture();
        let id = adjudicate_with_failed_cleanup(&f, 42).await;

        let settled = f.reconciler.reconcile_batch().await.unwrap();

        assert_eq!(settled, 1);
        assert!(f.boards.is_deleted(42));
        let stored = f.store.get(id).unwrap();
        assert!(stored.content_deleted_at.is_some());
        assert!(!stored.needs_cleanup());
    }

    #[tokio::test]
    async fn test_reconcile_with_nothing_pending_is_noop() {
        let f = fixture();
        assert_eq!(f.reconciler.reconcile_batch().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reconcile_keeps_record_when_delete_still_fails() {
        let f = fixture();
        let id = adjudicate_with_failed_cleanup(&f, 42).await;
        f.boards.fail_deletes(true);

        let settled = f.reconciler.reconcile_batch().await.unwrap();

        assert_eq!(settled, 0);
        assert!(f.store.get(id).unwrap().needs_cleanup());
    }

    #[tokio::test]
    async fn test_reconcile_settles_vanished_content() {
        let f = fixture();
        let id = adjudicate_with_failed_cleanup(&f, 43).await;
        f.boards.remove(43);

        let settled = f.reconciler.reconcile_batch().await.unwrap();

        assert_eq!(settled, 1);
        assert!(!f.store.get(id).unwrap().needs_cleanup());
        assert_eq!(
            f.store.get(id).unwrap().target,
            ContentTarget::Board(43)
        );
    }
}
