//! Diary HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::middleware::AuthenticatedAccount;
use crate::models::{
    ApiResponse, CreateDiaryRequest, Diary, DiaryListResponse, MessageResponse,
    UpdateDiaryRequest,
};
use crate::services::DiaryService;

/// GET /diary/getAllDiaries/:userid
pub async fn list_diaries(
    State(service): State<Arc<DiaryService>>,
    _caller: AuthenticatedAccount,
    Path(user_id): Path<String>,
) -> Result<Json<DiaryListResponse>, ApiError> {
    let diaries = service.list_diaries(&user_id).await?;

    Ok(Json(DiaryListResponse { diaries }))
}

/// GET /diary/getDiary/:id
pub async fn get_diary(
    State(service): State<Arc<DiaryService>>,
    _caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Diary>>, ApiError> {
    let diary = service.get_diary(id).await?;

    Ok(Json(ApiResponse::ok(diary)))
}

/// POST /diary/createDiary
pub async fn create_diary(
    State(service): State<Arc<DiaryService>>,
    caller: AuthenticatedAccount,
    Json(req): Json<CreateDiaryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Diary>>), ApiError> {
    req.validate()?;

    let diary = service.create_diary(req, &caller.user_id).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(diary))))
}

/// PATCH /diary/updateDiary/:id
pub async fn update_diary(
    State(service): State<Arc<DiaryService>>,
    _caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDiaryRequest>,
) -> Result<Json<ApiResponse<Diary>>, ApiError> {
    req.validate()?;

    let diary = service.update_diary(id, req).await?;

    Ok(Json(ApiResponse::ok(diary)))
}

/// DELETE /diary/deleteDiary/:id
pub async fn delete_diary(
    State(service): State<Arc<DiaryService>>,
    _caller: AuthenticatedAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service.delete_diary(id).await?;

    Ok(Json(MessageResponse::new("Diary deleted successfully")))
}
