//! Diary entry models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Persisted diary entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Diary {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    /// Client-supplied date label, stored verbatim
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDiaryRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(rename = "desc")]
    #[validate(length(min = 1, message = "desc is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    /// Owner; defaults to the authenticated caller
    pub user_id: Option<String>,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDiaryRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(rename = "desc")]
    #[validate(length(min = 1, message = "desc must not be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "date must not be empty"))]
    pub date: Option<String>,
}

impl UpdateDiaryRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.date.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct DiaryListResponse {
    pub diaries: Vec<Diary>,
}
