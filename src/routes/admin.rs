//! Admin routes (require a token; directory lookups also require ADMIN)

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{accounts, auth, requests};
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/info", get(auth::account_info))
        .route("/admin/adminInfo", get(auth::account_info))
        .route("/admin/sendRequest", post(requests::send_request))
        .route("/admin/allAdmins", get(accounts::list_admins))
        .route("/admin/adminsList", get(accounts::list_admins))
        .route("/admin/adminByID/:id", get(accounts::get_admin))
        .route("/admin/client/all-clients", get(accounts::list_clients))
        .route("/admin/client/:id", get(accounts::get_client))
        .route("/admin/all-requests", get(requests::list_requests))
        .route("/admin/modify-request/:id", put(requests::review_request))
}
