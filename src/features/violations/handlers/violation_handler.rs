use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::violations::dtos::{
    CleanupOutcome, CreateViolationDto, ProcessViolationDto, ProcessViolationResponseDto,
    ViolationQueryParams, ViolationResponseDto,
};
use crate::features::violations::services::ViolationService;
use crate::shared::types::{ApiResponse, PaginationQuery};

/// State for violation handlers
#[derive(Clone)]
pub struct ViolationState {
    pub violation_service: Arc<ViolationService>,
}

/// Report a board post or chat room
#[utoipa::path(
    post,
    path = "/api/violation",
    request_body = CreateViolationDto,
    responses(
        (status = 201, description = "Report filed", body = ApiResponse<ViolationResponseDto>),
        (status = 400, description = "Invalid target, self report or overlong detail"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Member or content not found")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn create_violation(
    user: AuthenticatedUser,
    State(state): State<ViolationState>,
    AppJson(dto): AppJson<CreateViolationDto>,
) -> Result<(StatusCode, Json<ApiResponse<ViolationResponseDto>>)> {
    let violation = state
        .violation_service
        .create_violation(user.member_id, dto)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(violation.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// Adjudicate a pending report (admin only)
///
/// A failed content removal still returns 200: the decision is kept and the
/// `cleanup` field carries the failure.
#[utoipa::path(
    post,
    path = "/api/violation/{id}/process",
    params(
        ("id" = i64, Path, description = "Violation ID")
    ),
    request_body = ProcessViolationDto,
    responses(
        (status = 200, description = "Report adjudicated", body = ApiResponse<ProcessViolationResponseDto>),
        (status = 400, description = "Decision is not VIOLATED or NORMAL"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Violation not found"),
        (status = 409, description = "Violation already processed")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn process_violation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<ViolationState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<ProcessViolationDto>,
) -> Result<Json<ApiResponse<ProcessViolationResponseDto>>> {
    let processed = state
        .violation_service
        .process_violation(id, admin.member_id, dto)
        .await?;

    let message = match &processed.cleanup {
        CleanupOutcome::Failed { .. } => {
            "Violation processed, but content removal failed and will be retried"
        }
        _ => "Violation processed",
    };

    Ok(Json(ApiResponse::success(
        Some(processed.into()),
        Some(message.to_string()),
        None,
    )))
}

/// List reports with filters (admin only)
#[utoipa::path(
    get,
    path = "/api/violation",
    params(ViolationQueryParams),
    responses(
        (status = 200, description = "Reports", body = ApiResponse<Vec<ViolationResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn list_violations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ViolationState>,
    Query(params): Query<ViolationQueryParams>,
) -> Result<Json<ApiResponse<Vec<ViolationResponseDto>>>> {
    let pagination = params.pagination();
    let (items, total) = state
        .violation_service
        .list(&params.filter(), pagination.offset(), pagination.limit())
        .await?;

    let dtos: Vec<ViolationResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(pagination.meta(total)),
    )))
}

/// Moderation queue: pending reports, newest first (admin only)
#[utoipa::path(
    get,
    path = "/api/violation/pending",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Pending reports", body = ApiResponse<Vec<ViolationResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn list_pending_violations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ViolationState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ViolationResponseDto>>>> {
    let (items, total) = state
        .violation_service
        .list_pending(pagination.offset(), pagination.limit())
        .await?;

    let dtos: Vec<ViolationResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(pagination.meta(total)),
    )))
}

/// Reports filed by the caller
#[utoipa::path(
    get,
    path = "/api/violation/me",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Caller's reports", body = ApiResponse<Vec<ViolationResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn list_my_violations(
    user: AuthenticatedUser,
    State(state): State<ViolationState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ViolationResponseDto>>>> {
    let (items, total) = state
        .violation_service
        .list_by_reporter(user.member_id, pagination.offset(), pagination.limit())
        .await?;

    let dtos: Vec<ViolationResponseDto> = items.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(pagination.meta(total)),
    )))
}

/// Get a report by ID (admin only)
#[utoipa::path(
    get,
    path = "/api/violation/{id}",
    params(
        ("id" = i64, Path, description = "Violation ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ViolationResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Violation not found")
    ),
    security(("bearer_auth" = [])),
    tag = "violations"
)]
pub async fn get_violation(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<ViolationState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ViolationResponseDto>>> {
    let violation = state.violation_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(violation.into()), None, None)))
}
