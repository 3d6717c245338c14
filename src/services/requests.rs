use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AdminRequest, CreateAdminRequest, ReviewStatus};
use crate::store::{with_timeout, AdminRequestStore};

/// Requests sent to admins and their review decisions
#[derive(Clone)]
pub struct AdminRequestService {
    store: Arc<dyn AdminRequestStore>,
    store_timeout: Duration,
}

impl AdminRequestService {
    pub fn new(store: Arc<dyn AdminRequestStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub async fn send_request(
        &self,
        request: CreateAdminRequest,
    ) -> Result<AdminRequest, ApiError> {
        let stored = with_timeout(
            self.store_timeout,
            self.store.insert_request(&request, Uuid::new_v4(), Utc::now()),
        )
        .await?;

        tracing::info!(request_id = %stored.id, sent_by = %stored.sent_by, "Admin request sent");

        Ok(stored)
    }

    pub async fn list_requests(&self) -> Result<Vec<AdminRequest>, ApiError> {
        Ok(with_timeout(self.store_timeout, self.store.list_requests()).await?)
    }

    /// Record an approve/reject decision
    pub async fn review(&self, id: Uuid, status: ReviewStatus) -> Result<AdminRequest, ApiError> {
        if status == ReviewStatus::Pending {
            return Err(ApiError::BadRequest(
                "status must be approved or rejected".to_string(),
            ));
        }

        let reviewed = with_timeout(
            self.store_timeout,
            self.store.set_review(id, status, Utc::now()),
        )
        .await?
        .ok_or(ApiError::NotFound("Request not found".to_string()))?;

        tracing::info!(request_id = %id, status = ?status, "Admin request reviewed");

        Ok(reviewed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AdminRequestService {
        AdminRequestService::new(Arc::new(MemoryStore::new()), Duration::from_secs(5))
    }

    fn request() -> CreateAdminRequest {
        CreateAdminRequest {
            title: "Access".to_string(),
            sent_by: "client-1".to_string(),
            description: "Please grant access to the shared diary".to_string(),
            short_description: "access".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_and_review() {
        let requests = service();
        let sent = requests.send_request(request()).await.unwrap();

        assert_eq!(sent.review_status, ReviewStatus::Pending);
        assert!(sent.reviewed_at.is_none());

        let reviewed = requests
            .review(sent.id, ReviewStatus::Approved)
            .await
            .unwrap();
        assert_eq!(reviewed.review_status, ReviewStatus::Approved);
        assert!(reviewed.reviewed_at.is_some());

        assert_eq!(requests.list_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_review_back_to_pending_rejected() {
        let requests = service();
        let sent = requests.send_request(request()).await.unwrap();

        let result = requests.review(sent.id, ReviewStatus::Pending).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_review_unknown_request() {
        let result = service()
            .review(Uuid::new_v4(), ReviewStatus::Rejected)
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
