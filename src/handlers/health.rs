//! Liveness handlers

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthService;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

/// GET /
pub async fn root() -> &'static str {
    "Diary API Server"
}

/// GET /health - Report store connectivity
pub async fn health_check(State(auth): State<Arc<AuthService>>) -> Json<HealthResponse> {
    let database = match auth.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
