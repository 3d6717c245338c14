//! Account models: users, admins and clients

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use validator::Validate;

/// Account kind tag stored on every account and carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "account_kind", rename_all = "UPPERCASE")]
pub enum AccountKind {
    User,
    Admin,
    Client,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::User => "USER",
            AccountKind::Admin => "ADMIN",
            AccountKind::Client => "CLIENT",
        }
    }

    /// Directory whose email namespace this kind shares
    pub fn directory(&self) -> Directory {
        match self {
            AccountKind::User | AccountKind::Admin => Directory::Users,
            AccountKind::Client => Directory::Clients,
        }
    }

    /// Clients get an access + refresh pair, everyone else an access token only
    pub fn issues_refresh_token(&self) -> bool {
        matches!(self, AccountKind::Client)
    }
}

/// Uniqueness namespace for account emails (and client contacts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directory {
    Users,
    Clients,
}

impl Directory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directory::Users => "users",
            Directory::Clients => "clients",
        }
    }

    pub fn contains(&self, kind: AccountKind) -> bool {
        kind.directory() == *self
    }
}

/// Persisted account record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub user_id: String,
    pub user_type: AccountKind,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub company: Option<String>,
    /// bcrypt digest, never serialized
    pub password: String,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Registration body shared by `/admin/signup` and `/client/signup`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "contact is required"))]
    pub contact: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "company must not be empty"))]
    pub company: Option<String>,
    /// Required on `/admin/signup` (`USER` or `ADMIN`), ignored for clients
    pub user_type: Option<AccountKind>,
}

/// Login body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Account as returned by the API (no password digest)
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub user_id: String,
    pub user_type: AccountKind,
    pub name: String,
    pub email: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.user_id,
            user_type: account.user_type,
            name: account.name,
            email: account.email,
            contact: account.contact,
            company: account.company,
            token: account.token,
            refresh_token: account.refresh_token,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Minimal identity view served by `/admin/info`
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.user_id,
            name: account.name,
            email: account.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub account: AccountResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub account: AccountResponse,
}

impl From<Account> for LoginResponse {
    fn from(account: Account) -> Self {
        Self {
            message: "Login successful".to_string(),
            token: account.token.clone(),
            refresh_token: account.refresh_token.clone(),
            account: account.into(),
        }
    }
}
