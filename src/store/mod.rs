//! Persistence seam
//!
//! Handlers and services talk to these traits; `PgStore` backs them with
//! Postgres and `MemoryStore` keeps everything in process.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Account, AccountKind, AdminRequest, CreateAdminRequest, Diary, Directory, ReviewStatus,
    UpdateDiaryRequest,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.message().to_string())
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Bound a store round trip by `limit`
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn count_by_email(&self, directory: Directory, email: &str) -> Result<u64, StoreError>;

    async fn count_by_contact(
        &self,
        directory: Directory,
        contact: &str,
    ) -> Result<u64, StoreError>;

    /// Insert a new account; a taken email/contact yields `Duplicate`
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    async fn find_by_email(
        &self,
        directory: Directory,
        email: &str,
    ) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<Account>, StoreError>;

    /// Overwrite the stored tokens; returns false when no account has that id
    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn list_by_kind(&self, kind: AccountKind) -> Result<Vec<Account>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DiaryStore: Send + Sync {
    async fn insert_diary(&self, diary: &Diary) -> Result<(), StoreError>;

    async fn get_diary(&self, id: Uuid) -> Result<Option<Diary>, StoreError>;

    async fn list_diaries(&self, user_id: &str) -> Result<Vec<Diary>, StoreError>;

    async fn update_diary(
        &self,
        id: Uuid,
        changes: &UpdateDiaryRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Diary>, StoreError>;

    /// Returns false when nothing was deleted
    async fn delete_diary(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AdminRequestStore: Send + Sync {
    async fn insert_request(
        &self,
        request: &CreateAdminRequest,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<AdminRequest, StoreError>;

    async fn list_requests(&self) -> Result<Vec<AdminRequest>, StoreError>;

    async fn set_review(
        &self,
        id: Uuid,
        status: ReviewStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<AdminRequest>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_with_timeout_passes_result_through() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_elapses() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, StoreError>(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::Timeout(_))));
    }
}
