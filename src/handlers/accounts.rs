//! Admin-only account directory handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::middleware::AdminAccount;
use crate::models::{AccountKind, AccountResponse, ApiResponse};

async fn list_kind(
    auth: &AuthService,
    kind: AccountKind,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, ApiError> {
    let accounts = auth.accounts_of_kind(kind).await?;

    Ok(Json(ApiResponse::ok(
        accounts.into_iter().map(AccountResponse::from).collect(),
    )))
}

/// GET /admin/allAdmins
pub async fn list_admins(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminAccount,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, ApiError> {
    list_kind(&auth, AccountKind::Admin).await
}

/// GET /admin/adminByID/:id
pub async fn get_admin(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminAccount,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = auth.account_of_kind(&user_id, AccountKind::Admin).await?;

    Ok(Json(ApiResponse::ok(account.into())))
}

/// GET /admin/client/all-clients
pub async fn list_clients(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminAccount,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, ApiError> {
    list_kind(&auth, AccountKind::Client).await
}

/// GET /admin/client/:id
pub async fn get_client(
    State(auth): State<Arc<AuthService>>,
    _admin: AdminAccount,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = auth.account_of_kind(&user_id, AccountKind::Client).await?;

    Ok(Json(ApiResponse::ok(account.into())))
}
