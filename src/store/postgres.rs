//! Postgres-backed store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AccountStore, AdminRequestStore, DiaryStore, StoreError};
use crate::models::{
    Account, AccountKind, AdminRequest, CreateAdminRequest, Diary, Directory, ReviewStatus,
    UpdateDiaryRequest,
};

const ACCOUNT_COLUMNS: &str = "user_id, user_type, name, email, contact, company, password, \
                               token, refresh_token, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    db_pool: PgPool,
}

impl PgStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn count_by_email(&self, directory: Directory, email: &str) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE directory = $1 AND email = $2")
                .bind(directory.as_str())
                .bind(email)
                .fetch_one(&self.db_pool)
                .await?;

        Ok(count.max(0) as u64)
    }

    async fn count_by_contact(
        &self,
        directory: Directory,
        contact: &str,
    ) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM accounts WHERE directory = $1 AND contact = $2",
        )
        .bind(directory.as_str())
        .bind(contact)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                user_id, directory, user_type, name, email, contact, company,
                password, token, refresh_token, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(&account.user_id)
        .bind(account.user_type.directory().as_str())
        .bind(account.user_type)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.contact)
        .bind(&account.company)
        .bind(&account.password)
        .bind(&account.token)
        .bind(&account.refresh_token)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(
        &self,
        directory: Directory,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE directory = $1 AND email = $2"
        ))
        .bind(directory.as_str())
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(account)
    }

    async fn update_tokens(
        &self,
        user_id: &str,
        token: &str,
        refresh_token: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE accounts
            SET token = $2, refresh_token = $3, updated_at = $4
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(refresh_token)
        .bind(updated_at)
        .execute(&self.db_pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn list_by_kind(&self, kind: AccountKind) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE user_type = $1 ORDER BY created_at"
        ))
        .bind(kind)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(accounts)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DiaryStore for PgStore {
    async fn insert_diary(&self, diary: &Diary) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO diaries (id, user_id, title, description, date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(diary.id)
        .bind(&diary.user_id)
        .bind(&diary.title)
        .bind(&diary.description)
        .bind(&diary.date)
        .bind(diary.created_at)
        .bind(diary.updated_at)
        .execute(&self.db_pool)
        .await?;

        Ok(())
    }

    async fn get_diary(&self, id: Uuid) -> Result<Option<Diary>, StoreError> {
        let diary = sqlx::query_as::<_, Diary>("SELECT * FROM diaries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(diary)
    }

    async fn list_diaries(&self, user_id: &str) -> Result<Vec<Diary>, StoreError> {
        let diaries = sqlx::query_as::<_, Diary>(
            "SELECT * FROM diaries WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(diaries)
    }

    async fn update_diary(
        &self,
        id: Uuid,
        changes: &UpdateDiaryRequest,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Diary>, StoreError> {
        let diary = sqlx::query_as::<_, Diary>(
            r#"
            UPDATE diaries
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                updated_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.date)
        .bind(updated_at)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(diary)
    }

    async fn delete_diary(&self, id: Uuid) -> Result<bool, StoreError> {
        let rows_affected = sqlx::query("DELETE FROM diaries WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl AdminRequestStore for PgStore {
    async fn insert_request(
        &self,
        request: &CreateAdminRequest,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<AdminRequest, StoreError> {
        let stored = sqlx::query_as::<_, AdminRequest>(
            r#"
            INSERT INTO admin_requests (
                id, title, sent_by, description, short_description, sent_at, review_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.sent_by)
        .bind(&request.description)
        .bind(&request.short_description)
        .bind(sent_at)
        .bind(ReviewStatus::Pending)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(stored)
    }

    async fn list_requests(&self) -> Result<Vec<AdminRequest>, StoreError> {
        let requests =
            sqlx::query_as::<_, AdminRequest>("SELECT * FROM admin_requests ORDER BY sent_at")
                .fetch_all(&self.db_pool)
                .await?;

        Ok(requests)
    }

    async fn set_review(
        &self,
        id: Uuid,
        status: ReviewStatus,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<AdminRequest>, StoreError> {
        let updated = sqlx::query_as::<_, AdminRequest>(
            r#"
            UPDATE admin_requests
            SET review_status = $2, reviewed_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_at)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(updated)
    }
}
