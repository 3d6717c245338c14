//! Requests sent to admins for review

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Review state of an admin request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Persisted admin request
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminRequest {
    pub id: Uuid,
    pub title: String,
    pub sent_by: String,
    pub description: String,
    pub short_description: String,
    pub sent_at: DateTime<Utc>,
    pub review_status: ReviewStatus,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Body of `POST /admin/sendRequest`
///
/// Older clients send `name`, `send_by`, `discription` and `short_discription`;
/// those spellings are accepted on input only. A client-supplied `sended_at`
/// is ignored since the server stamps `sent_at` itself.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAdminRequest {
    #[serde(alias = "name")]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(alias = "send_by")]
    #[validate(length(min = 1, message = "sent_by is required"))]
    pub sent_by: String,
    #[serde(alias = "discription")]
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(alias = "short_discription")]
    #[validate(length(min = 1, message = "short_description is required"))]
    pub short_description: String,
}

/// Body of `PUT /admin/modify-request/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDecision {
    pub status: ReviewStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_legacy_field_names() {
        let body = serde_json::json!({
            "name": "Quota",
            "send_by": "client@example.com",
            "discription": "Need more diary space",
            "short_discription": "space",
            "sended_at": "2024-01-01T00:00:00Z"
        });

        let parsed: CreateAdminRequest = serde_json::from_value(body).unwrap();

        assert_eq!(parsed.title, "Quota");
        assert_eq!(parsed.sent_by, "client@example.com");
        assert_eq!(parsed.description, "Need more diary space");
        assert_eq!(parsed.short_description, "space");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_review_status_wire_names() {
        let status: ReviewStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, ReviewStatus::Approved);
        assert_eq!(serde_json::to_string(&ReviewStatus::Pending).unwrap(), "\"pending\"");
    }
}
