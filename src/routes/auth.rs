//! Public signup and login routes

use axum::{routing::post, Router};

use crate::handlers::auth;
use crate::state::AppState;

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/signup", post(auth::admin_signup))
        .route("/admin/login", post(auth::admin_login))
        .route("/client/signup", post(auth::client_signup))
        .route("/client/login", post(auth::client_login))
}
