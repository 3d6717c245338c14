//! Diary routes

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::diary;
use crate::state::AppState;

/// Create diary routes
pub fn diary_routes() -> Router<AppState> {
    Router::new()
        .route("/diary/getAllDiaries/:userid", get(diary::list_diaries))
        .route("/diary/getDiary/:id", get(diary::get_diary))
        .route("/diary/createDiary", post(diary::create_diary))
        .route("/diary/updateDiary/:id", patch(diary::update_diary))
        .route("/diary/deleteDiary/:id", delete(diary::delete_diary))
}
