//! In-process store for local development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, AdminRequestStore, DiaryStore, StoreError};
use crate::models::{
    Account, AccountKind, AdminRequest, CreateAdminRequest, Diary, Directory, ReviewStatus,
    UpdateDiaryRequest,
};

#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, Account>>,
    diaries: RwLock<HashMap<Uuid, Diary>>,
    requests: RwLock<HashMap<Uuid, AdminRequest>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn count_by_email(&self, directory: Directory, email: &str) -> Result<u64, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|a| directory.contains(a.user_type) && a.email == email)
            .count() as u64)
    }

    async fn count_by_contact(
        &self,
        directory: Directory,
        contact: &str,
    ) -> Result<u64, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .filter(|a| directory.contains(a.user_type) && a.contact == contact)
            .count() as u64)
    }

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let directory = account.user_type.directory();

        // Same uniqueness rules as the Postgres indexes
        let taken = accounts.values().any(|existing| {
            directory.contains(existing.user_type)
                && (existing.email == account.email
                    || (directory == Directory::Clients && existing.contact == account.contact))
        });
        if taken || accounts.contains_key(&account.user_id) {
            return Err(StoreError::Duplicate(format!(
                "account {} already exists",
                account.email
            )));
        }

        accounts.insert(account.user_id.clone(), account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        directory: Directory,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| directory.contains(a.user_type) && a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(user_id).cloned())
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(user_id) {
            Some(account) => {
                account.token = Some(token.to_string());
                account.refresh_token = refresh_token.map(str::to_string);
                account.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_kind(&self, kind: AccountKind) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        let mut matching: Vec<Account> = accounts
            .values()
            .filter(|a| a.user_type == kind)
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.created_at);
        Ok(matching)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl DiaryStore for MemoryStore {
    async fn insert_diary(&self, diary: &Diary) -> Result<(), StoreError> {
        self.diaries.write().await.insert(diary.id, diary.clone());
        Ok(())
    }

    async fn get_diary(&self, id: Uuid) -> Result<Option<Diary>, StoreError> {
        Ok(self.diaries.read().await.get(&id).cloned())
    }

    async fn list_diaries(&self, user_id: &str) -> Result<Vec<Diary>, StoreError> {
        let diaries = self.diaries.read().await;
        let mut owned: Vec<Diary> = diaries
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|d| d.created_at);
        Ok(owned)
    }

    async fn update_diary(
        &self,
        id: Uuid,
        changes: &UpdateDiaryRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Diary>, StoreError> {
        let mut diaries = self.diaries.write().await;
        let Some(diary) = diaries.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            diary.title = title.clone();
        }
        if let Some(description) = &changes.description {
            diary.description = description.clone();
        }
        if let Some(date) = &changes.date {
            diary.date = date.clone();
        }
        diary.updated_at = updated_at;

        Ok(Some(diary.clone()))
    }

    async fn delete_diary(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.diaries.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl AdminRequestStore for MemoryStore {
    async fn insert_request(
        &self,
        request: &CreateAdminRequest,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<AdminRequest, StoreError> {
        let stored = AdminRequest {
            id,
            title: request.title.clone(),
            sent_by: request.sent_by.clone(),
            description: request.description.clone(),
            short_description: request.short_description.clone(),
            sent_at,
            review_status: ReviewStatus::Pending,
            reviewed_at: None,
        };
        self.requests.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_requests(&self) -> Result<Vec<AdminRequest>, StoreError> {
        let requests = self.requests.read().await;
        let mut all: Vec<AdminRequest> = requests.values().cloned().collect();
        all.sort_by_key(|r| r.sent_at);
        Ok(all)
    }

    async fn set_review(
        &self,
        id: Uuid,
        status: ReviewStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<AdminRequest>, StoreError> {
        let mut requests = self.requests.write().await;
        Ok(requests.get_mut(&id).map(|request| {
            request.review_status = status;
            request.reviewed_at = Some(reviewed_at);
            request.clone()
        }))
    }
}
