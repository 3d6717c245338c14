//! Authentication HTTP handlers
//!
//! Signup and login for the `users` (USER/ADMIN) and `clients` directories.

use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::middleware::AuthenticatedAccount;
use crate::models::{
    AccountKind, AccountSummary, Directory, LoginRequest, LoginResponse, RegisterResponse,
    SignupRequest,
};

/// POST /admin/signup - Register a USER or ADMIN account
pub async fn admin_signup(
    State(auth): State<Arc<AuthService>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    req.validate()?;

    let kind = match req.user_type {
        Some(kind @ (AccountKind::User | AccountKind::Admin)) => kind,
        Some(AccountKind::Client) => {
            return Err(ApiError::ValidationError(
                "user_type must be USER or ADMIN".to_string(),
            ))
        }
        None => return Err(ApiError::ValidationError("user_type is required".to_string())),
    };

    let account = auth.register(kind, req).await?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        account: account.into(),
    }))
}

/// POST /admin/login - Log in to the users directory
pub async fn admin_login(
    State(auth): State<Arc<AuthService>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()?;

    let account = auth.login(Directory::Users, req).await?;

    Ok(Json(account.into()))
}

/// POST /client/signup - Register a client account
pub async fn client_signup(
    State(auth): State<Arc<AuthService>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    req.validate()?;

    let account = auth.register(AccountKind::Client, req).await?;

    Ok(Json(RegisterResponse {
        message: "client registered successfully".to_string(),
        account: account.into(),
    }))
}

/// POST /client/login - Log in to the clients directory
pub async fn client_login(
    State(auth): State<Arc<AuthService>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()?;

    let account = auth.login(Directory::Clients, req).await?;

    Ok(Json(account.into()))
}

/// GET /admin/info - Identity of the current caller
pub async fn account_info(
    State(auth): State<Arc<AuthService>>,
    caller: AuthenticatedAccount,
) -> Result<Json<AccountSummary>, ApiError> {
    let account = auth.account(&caller.user_id).await?;

    Ok(Json(account.into()))
}
