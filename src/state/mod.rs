//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::{AuthService, PasswordHasher, TokenService};
use crate::config::Config;
use crate::services::{AdminRequestService, DiaryService};
use crate::store::{AccountStore, AdminRequestStore, DiaryStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub diary_service: Arc<DiaryService>,
    pub request_service: Arc<AdminRequestService>,
}

impl AppState {
    /// Wire every service from the configuration and one store handle
    pub fn from_config<S>(config: &Config, store: Arc<S>) -> Self
    where
        S: AccountStore + DiaryStore + AdminRequestStore + 'static,
    {
        let tokens = Arc::new(TokenService::new(
            &config.jwt_secret,
            config.access_token_ttl(),
            config.refresh_token_ttl(),
        ));

        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            tokens.clone(),
            PasswordHasher::new(config.bcrypt_cost),
            config.store_timeout,
        ));

        let diary_service = Arc::new(DiaryService::new(store.clone(), config.store_timeout));
        let request_service = Arc::new(AdminRequestService::new(store, config.store_timeout));

        Self {
            auth_service,
            tokens,
            diary_service,
            request_service,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<DiaryService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.diary_service.clone()
    }
}

impl FromRef<AppState> for Arc<AdminRequestService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.request_service.clone()
    }
}
