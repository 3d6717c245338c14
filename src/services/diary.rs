use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateDiaryRequest, Diary, UpdateDiaryRequest};
use crate::store::{with_timeout, DiaryStore};

#[derive(Clone)]
pub struct DiaryService {
    store: Arc<dyn DiaryStore>,
    store_timeout: Duration,
}

impl DiaryService {
    pub fn new(store: Arc<dyn DiaryStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    /// Create an entry owned by `owner` unless the request names one
    pub async fn create_diary(
        &self,
        request: CreateDiaryRequest,
        owner: &str,
    ) -> Result<Diary, ApiError> {
        let now = Utc::now();
        let diary = Diary {
            id: Uuid::new_v4(),
            user_id: request.user_id.unwrap_or_else(|| owner.to_string()),
            title: request.title,
            description: request.description,
            date: request.date,
            created_at: now,
            updated_at: now,
        };

        with_timeout(self.store_timeout, self.store.insert_diary(&diary)).await?;

        tracing::info!(diary_id = %diary.id, user_id = %diary.user_id, "Diary entry created");

        Ok(diary)
    }

    pub async fn get_diary(&self, id: Uuid) -> Result<Diary, ApiError> {
        with_timeout(self.store_timeout, self.store.get_diary(id))
            .await?
            .ok_or(ApiError::NotFound("Diary not found".to_string()))
    }

    pub async fn list_diaries(&self, user_id: &str) -> Result<Vec<Diary>, ApiError> {
        Ok(with_timeout(self.store_timeout, self.store.list_diaries(user_id)).await?)
    }

    pub async fn update_diary(
        &self,
        id: Uuid,
        changes: UpdateDiaryRequest,
    ) -> Result<Diary, ApiError> {
        if changes.is_empty() {
            return Err(ApiError::BadRequest("No fields to update".to_string()));
        }

        with_timeout(
            self.store_timeout,
            self.store.update_diary(id, &changes, Utc::now()),
        )
        .await?
        .ok_or(ApiError::NotFound("Diary not found".to_string()))
    }

    pub async fn delete_diary(&self, id: Uuid) -> Result<(), ApiError> {
        let deleted = with_timeout(self.store_timeout, self.store.delete_diary(id)).await?;
        if !deleted {
            return Err(ApiError::NotFound("Diary not found".to_string()));
        }

        tracing::info!(diary_id = %id, "Diary entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> DiaryService {
        DiaryService::new(Arc::new(MemoryStore::new()), Duration::from_secs(5))
    }

    fn entry(title: &str) -> CreateDiaryRequest {
        CreateDiaryRequest {
            title: title.to_string(),
            description: "went hiking".to_string(),
            date: "2024-05-01".to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults_owner() {
        let diaries = service();
        let diary = diaries.create_diary(entry("Day 1"), "user-1").await.unwrap();

        assert_eq!(diary.user_id, "user-1");
        assert_eq!(diaries.list_diaries("user-1").await.unwrap().len(), 1);
        assert!(diaries.list_diaries("user-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let diaries = service();
        let diary = diaries.create_diary(entry("Day 1"), "user-1").await.unwrap();

        let updated = diaries
            .update_diary(
                diary.id,
                UpdateDiaryRequest {
                    title: Some("Day one".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Day one");
        assert_eq!(updated.description, "went hiking");
    }

    #[tokio::test]
    async fn test_empty_update_rejected() {
        let diaries = service();
        let diary = diaries.create_diary(entry("Day 1"), "user-1").await.unwrap();

        let result = diaries
            .update_diary(diary.id, UpdateDiaryRequest::default())
            .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_missing_diary() {
        let diaries = service();

        assert!(matches!(
            diaries.get_diary(Uuid::new_v4()).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            diaries.delete_diary(Uuid::new_v4()).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
