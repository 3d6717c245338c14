//! Route definitions for the diary API

mod admin;
mod auth;
mod diary;

use axum::{middleware, routing::get, Router};

use crate::handlers::health;
use crate::middleware::{request_tracing, require_auth};
use crate::state::AppState;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use diary::diary_routes;

/// Assemble the full application router
///
/// Signup, login and liveness routes are public. Everything else sits behind
/// the token gate, which rejects the request before any handler runs.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(admin_routes())
        .merge(diary_routes())
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_auth,
        ));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .merge(auth_routes())
        .merge(protected)
        .with_state(state)
        .layer(middleware::from_fn(request_tracing))
}
