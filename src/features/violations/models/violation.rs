use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::content::{ContentKind, ContentTarget};

/// Adjudication status matching the `violation_status` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "violation_status", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationStatus {
    Pending,
    Violated,
    Normal,
}

impl ViolationStatus {
    /// `Violated` and `Normal` are final; nothing leaves them
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ViolationStatus::Pending)
    }
}

impl std::fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationStatus::Pending => write!(f, "pending"),
            ViolationStatus::Violated => write!(f, "violated"),
            ViolationStatus::Normal => write!(f, "normal"),
        }
    }
}

/// Report reason matching the `violation_reason` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "violation_reason", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationReason {
    Spam,
    Harassment,
    Inappropriate,
    Fraud,
    Other,
}

impl std::fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationReason::Spam => write!(f, "spam"),
            ViolationReason::Harassment => write!(f, "harassment"),
            ViolationReason::Inappropriate => write!(f, "inappropriate"),
            ViolationReason::Fraud => write!(f, "fraud"),
            ViolationReason::Other => write!(f, "other"),
        }
    }
}

/// Row of the `violations` table
#[derive(Debug, Clone, FromRow)]
pub struct ViolationRow {
    pub id: i64,
    pub reason: ViolationReason,
    pub detail_reason: Option<String>,
    pub status: ViolationStatus,
    pub reporter_id: i64,
    pub reported_member_id: Option<i64>,
    pub board_id: Option<i64>,
    pub chat_room_id: Option<i64>,
    pub delete_requested: bool,
    pub processed_by: Option<i64>,
    pub processed_at: Option<DateTime<Utc>>,
    pub content_deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A violation report and its adjudication state
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub id: i64,
    pub reason: ViolationReason,
    pub detail_reason: Option<String>,
    pub status: ViolationStatus,
    pub reporter_id: i64,
    pub reported_member_id: Option<i64>,
    pub target: ContentTarget,
    /// Set at adjudication when the decision removes the reported content
    pub delete_requested: bool,
    pub processed_by: Option<i64>,
    pub processed_at: Option<DateTime<Utc>>,
    pub content_deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Violation {
    /// Adjudicated with removal decided, but the removal is not yet confirmed
    #[cfg(test)]
    pub fn needs_cleanup(&self) -> bool {
        self.status.is_terminal() && self.delete_requested && self.content_deleted_at.is_none()
    }
}

impl TryFrom<ViolationRow> for Violation {
    type Error = AppError;

    fn try_from(row: ViolationRow) -> Result<Self> {
        let target = ContentTarget::from_parts(row.board_id, row.chat_room_id).map_err(|_| {
            AppError::Internal(format!("Violation {} has an invalid content target", row.id))
        })?;

        Ok(Self {
            id: row.id,
            reason: row.reason,
            detail_reason: row.detail_reason,
            status: row.status,
            reporter_id: row.reporter_id,
            reported_member_id: row.reported_member_id,
            target,
            delete_requested: row.delete_requested,
            processed_by: row.processed_by,
            processed_at: row.processed_at,
            content_deleted_at: row.content_deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Data for persisting a new report; always stored as `Pending`
#[derive(Debug, Clone)]
pub struct NewViolation {
    pub reason: ViolationReason,
    pub detail_reason: Option<String>,
    pub reporter_id: i64,
    pub reported_member_id: Option<i64>,
    pub target: ContentTarget,
}

/// Conditional `Pending -> status` write performed at adjudication
#[derive(Debug, Clone, Copy)]
pub struct StatusTransition {
    pub status: ViolationStatus,
    pub processed_by: i64,
    pub delete_requested: bool,
}

/// Moderator decision on a pending report
#[derive(Debug, Clone, Copy)]
pub struct ViolationDecision {
    pub status: ViolationStatus,
    /// Explicit override of the per-status deletion default
    pub delete_content: Option<bool>,
}

impl ViolationDecision {
    /// `Violated` removes content unless told otherwise; `Normal` keeps it unless told otherwise
    pub fn should_delete_content(&self) -> bool {
        self.delete_content
            .unwrap_or(matches!(self.status, ViolationStatus::Violated))
    }
}

/// Filters for listing reports
#[derive(Debug, Clone, Default)]
pub struct ViolationFilter {
    pub status: Option<ViolationStatus>,
    pub reason: Option<ViolationReason>,
    pub reporter_id: Option<i64>,
    pub reported_member_id: Option<i64>,
    pub target_kind: Option<ContentKind>,
}

impl ViolationFilter {
    /// The moderation queue
    pub fn pending() -> Self {
        Self {
            status: Some(ViolationStatus::Pending),
            ..Default::default()
        }
    }

    pub fn by_reporter(reporter_id: i64) -> Self {
        Self {
            reporter_id: Some(reporter_id),
            ..Default::default()
        }
    }
}
