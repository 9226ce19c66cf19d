use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::{AppError, Result};
use crate::features::content::ContentKind;
use crate::features::violations::models::{
    NewViolation, StatusTransition, Violation, ViolationFilter, ViolationRow, ViolationStatus,
};

/// Persistence of violation reports and their adjudication state
#[async_trait]
pub trait ViolationStore: Send + Sync {
    /// Insert a new report in `Pending`
    async fn create(&self, new: NewViolation) -> Result<Violation>;

    async fn find_by_id(&self, id: i64) -> Result<Violation>;

    /// Atomically move a `Pending` report to a terminal status.
    ///
    /// `AppError::NotFound` if the report is absent, `AppError::InvalidState` if it is
    /// no longer pending. Of two concurrent calls on the same report, exactly one wins.
    async fn update_status(&self, id: i64, transition: StatusTransition) -> Result<Violation>;

    /// Newest first, with the total count of matching rows
    async fn list(
        &self,
        filter: &ViolationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Violation>, i64)>;

    /// Adjudicated reports whose requested content removal has not been confirmed
    async fn list_cleanup_pending(&self, limit: i64) -> Result<Vec<Violation>>;

    /// Record that the reported content is gone
    async fn mark_content_deleted(&self, id: i64) -> Result<Violation>;
}

const VIOLATION_COLUMNS: &str = r#"
    id, reason, detail_reason, status, reporter_id, reported_member_id,
    board_id, chat_room_id, delete_requested, processed_by, processed_at,
    content_deleted_at, created_at, updated_at
"#;

pub struct PgViolationStore {
    pool: PgPool,
}

impl PgViolationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ViolationFilter) {
        builder.push(" WHERE TRUE");

        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(reason) = filter.reason {
            builder.push(" AND reason = ").push_bind(reason);
        }
        if let Some(reporter_id) = filter.reporter_id {
            builder.push(" AND reporter_id = ").push_bind(reporter_id);
        }
        if let Some(reported_member_id) = filter.reported_member_id {
            builder
                .push(" AND reported_member_id = ")
                .push_bind(reported_member_id);
        }
        match filter.target_kind {
            Some(ContentKind::Board) => {
                builder.push(" AND board_id IS NOT NULL");
            }
            Some(ContentKind::ChatRoom) => {
                builder.push(" AND chat_room_id IS NOT NULL");
            }
            None => {}
        }
    }
}

#[async_trait]
impl ViolationStore for PgViolationStore {
    async fn create(&self, new: NewViolation) -> Result<Violation> {
        let row = sqlx::query_as::<_, ViolationRow>(&format!(
            r#"
            INSERT INTO violations (
                reason, detail_reason, status, reporter_id, reported_member_id,
                board_id, chat_room_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            VIOLATION_COLUMNS
        ))
        .bind(new.reason)
        .bind(&new.detail_reason)
        .bind(ViolationStatus::Pending)
        .bind(new.reporter_id)
        .bind(new.reported_member_id)
        .bind(new.target.board_id())
        .bind(new.target.chat_room_id())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create violation: {:?}", e);
            AppError::Database(e)
        })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Violation> {
        let row = sqlx::query_as::<_, ViolationRow>(&format!(
            "SELECT {} FROM violations WHERE id = $1",
            VIOLATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get violation by ID: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Violation {} not found", id)))?;

        row.try_into()
    }

    async fn update_status(&self, id: i64, transition: StatusTransition) -> Result<Violation> {
        // Guarding on the current status in the same statement closes the
        // read-then-write race between concurrent moderators.
        let updated = sqlx::query_as::<_, ViolationRow>(&format!(
            r#"
            UPDATE violations
            SET
                status = $2,
                processed_by = $3,
                processed_at = NOW(),
                delete_requested = $4,
                updated_at = NOW()
            WHERE id = $1 AND status = $5
            RETURNING {}
            "#,
            VIOLATION_COLUMNS
        ))
        .bind(id)
        .bind(transition.status)
        .bind(transition.processed_by)
        .bind(transition.delete_requested)
        .bind(ViolationStatus::Pending)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update violation status: {:?}", e);
            AppError::Database(e)
        })?;

        if let Some(row) = updated {
            return row.try_into();
        }

        let current = sqlx::query_scalar::<_, ViolationStatus>(
            "SELECT status FROM violations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to read violation status: {:?}", e);
            AppError::Database(e)
        })?;

        match current {
            Some(status) => Err(AppError::InvalidState(format!(
                "Violation {} was already processed as {}",
                id, status
            ))),
            None => Err(AppError::NotFound(format!("Violation {} not found", id))),
        }
    }

    async fn list(
        &self,
        filter: &ViolationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Violation>, i64)> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM violations");
        Self::push_filters(&mut count_query, filter);

        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count violations: {:?}", e);
                AppError::Database(e)
            })?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM violations", VIOLATION_COLUMNS));
        Self::push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows: Vec<ViolationRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list violations: {:?}", e);
                AppError::Database(e)
            })?;

        let items = rows
            .into_iter()
            .map(Violation::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((items, total))
    }

    async fn list_cleanup_pending(&self, limit: i64) -> Result<Vec<Violation>> {
        let rows = sqlx::query_as::<_, ViolationRow>(&format!(
            r#"
            SELECT {}
            FROM violations
            WHERE status <> $1
              AND delete_requested
              AND content_deleted_at IS NULL
            ORDER BY processed_at ASC
            LIMIT $2
            "#,
            VIOLATION_COLUMNS
        ))
        .bind(ViolationStatus::Pending)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list violations awaiting cleanup: {:?}", e);
            AppError::Database(e)
        })?;

        rows.into_iter().map(Violation::try_from).collect()
    }

    async fn mark_content_deleted(&self, id: i64) -> Result<Violation> {
        let row = sqlx::query_as::<_, ViolationRow>(&format!(
            r#"
            UPDATE violations
            SET content_deleted_at = COALESCE(content_deleted_at, NOW()), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VIOLATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark violation content deleted: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Violation {} not found", id)))?;

        row.try_into()
    }
}
