//! Admin request HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::{AdminAccount, AuthenticatedAccount};
use crate::models::{AdminRequest, ApiResponse, CreateAdminRequest, ReviewDecision};
use crate::services::AdminRequestService;

/// POST /admin/sendRequest
pub async fn send_request(
    State(service): State<Arc<AdminRequestService>>,
    _caller: AuthenticatedAccount,
    Json(req): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AdminRequest>>), ApiError> {
    req.validate()?;

    let request = service.send_request(req).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}

/// GET /admin/all-requests
pub async fn list_requests(
    State(service): State<Arc<AdminRequestService>>,
    _admin: AdminAccount,
) -> Result<Json<ApiResponse<Vec<AdminRequest>>>, ApiError> {
    let requests = service.list_requests().await?;

    Ok(Json(ApiResponse::ok(requests)))
}

/// PUT /admin/modify-request/:id
pub async fn review_request(
    State(service): State<Arc<AdminRequestService>>,
    AdminAccount(admin): AdminAccount,
    Path(id): Path<Uuid>,
    Json(decision): Json<ReviewDecision>,
) -> Result<Json<ApiResponse<AdminRequest>>, ApiError> {
    let request = service.review(id, decision.status).await?;

    tracing::debug!(request_id = %id, reviewer = %admin.user_id, "Review recorded");

    Ok(Json(ApiResponse::ok(request)))
}
