use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::content::ContentKind;
use crate::features::violations::models::{
    Violation, ViolationFilter, ViolationReason, ViolationStatus,
};
use crate::features::violations::services::ProcessedViolation;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::types::PaginationQuery;

/// Request DTO for reporting a board post or chat room.
///
/// Exactly one of `boardId` and `chatRoomId` must be set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateViolationDto {
    pub board_id: Option<i64>,
    pub chat_room_id: Option<i64>,
    pub reason: ViolationReason,
    #[validate(length(max = 500, message = "Detail reason must not exceed 500 characters"))]
    pub detail_reason: Option<String>,
}

/// Request DTO for adjudicating a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessViolationDto {
    /// VIOLATED or NORMAL
    pub violated_status: ViolationStatus,
    /// Overrides the default (remove when VIOLATED, keep when NORMAL)
    pub delete_content: Option<bool>,
}

/// What happened to the reported content after adjudication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CleanupOutcome {
    /// The decision keeps the content
    Skipped,
    /// The content is soft deleted
    Deleted,
    /// The decision stands but removal failed; it will be retried in the background
    Failed { reason: String },
}

/// Response DTO for a violation report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViolationResponseDto {
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
}

impl From<Violation> for ViolationResponseDto {
    fn from(v: Violation) -> Self {
        Self {
            id: v.id,
            reason: v.reason,
            detail_reason: v.detail_reason,
            status: v.status,
            reporter_id: v.reporter_id,
            reported_member_id: v.reported_member_id,
            board_id: v.target.board_id(),
            chat_room_id: v.target.chat_room_id(),
            delete_requested: v.delete_requested,
            processed_by: v.processed_by,
            processed_at: v.processed_at,
            content_deleted_at: v.content_deleted_at,
            created_at: v.created_at,
        }
    }
}

/// Response DTO for an adjudication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessViolationResponseDto {
    pub violation: ViolationResponseDto,
    pub cleanup: CleanupOutcome,
}

impl From<ProcessedViolation> for ProcessViolationResponseDto {
    fn from(p: ProcessedViolation) -> Self {
        Self {
            violation: p.violation.into(),
            cleanup: p.cleanup,
        }
    }
}

/// Query params for the moderator listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ViolationQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by status
    pub status: Option<ViolationStatus>,
    /// Filter by reason
    pub reason: Option<ViolationReason>,
    /// Filter by reporting member
    pub reporter_id: Option<i64>,
    /// Filter by reported member
    pub reported_member_id: Option<i64>,
    /// Filter by kind of reported content
    pub target: Option<ContentKind>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ViolationQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn filter(&self) -> ViolationFilter {
        ViolationFilter {
            status: self.status,
            reason: self.reason,
            reporter_id: self.reporter_id,
            reported_member_id: self.reported_member_id,
            target_kind: self.target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::content::ContentTarget;

    #[test]
    fn test_create_request_uses_camel_case() {
        let dto: CreateViolationDto = serde_json::from_str(
            r#"{"boardId": 42, "reason": "SPAM", "detailReason": "link farm"}"#,
        )
        .unwrap();

        assert_eq!(dto.board_id, Some(42));
        assert_eq!(dto.chat_room_id, None);
        assert_eq!(dto.reason, ViolationReason::Spam);
    }

    #[test]
    fn test_process_request_delete_content_is_optional() {
        let dto: ProcessViolationDto =
            serde_json::from_str(r#"{"violatedStatus": "VIOLATED"}"#).unwrap();

        assert_eq!(dto.violated_status, ViolationStatus::Violated);
        assert_eq!(dto.delete_content, None);
    }

    #[test]
    fn test_unknown_reason_is_rejected() {
        let result =
            serde_json::from_str::<CreateViolationDto>(r#"{"boardId": 1, "reason": "BORING"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_cleanup_serializes_with_reason() {
        let json = serde_json::to_value(CleanupOutcome::Failed {
            reason: "timeout".to_string(),
        })
        .unwrap();

        assert_eq!(json["result"], "FAILED");
        assert_eq!(json["reason"], "timeout");
    }

    #[test]
    fn test_response_flattens_target() {
        let now = Utc::now();
        let violation = Violation {
            id: 3,
            reason: ViolationReason::Spam,
            detail_reason: None,
            status: ViolationStatus::Pending,
            reporter_id: 7,
            reported_member_id: Some(11),
            target: ContentTarget::ChatRoom(5),
            delete_requested: false,
            processed_by: None,
            processed_at: None,
            content_deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let dto = ViolationResponseDto::from(violation);
        assert_eq!(dto.board_id, None);
        assert_eq!(dto.chat_room_id, Some(5));
    }
}
