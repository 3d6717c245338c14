//! Authentication service
//!
//! Registration, login and token persistence for every account kind.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::models::{Account, AccountKind, Directory, LoginRequest, SignupRequest};
use crate::store::{with_timeout, AccountStore, StoreError};

use super::jwt::{Identity, IssuedTokens, JwtError, TokenService};
use super::password::{PasswordError, PasswordHasher};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("this email or contact already exists")]
    DuplicateAccount,

    /// Shared by "no such account" and "wrong password"
    #[error("email or password not matched")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::Hashing(e.to_string())
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    store_timeout: Duration,
    /// Digest checked on an unknown email so the miss costs the same as a
    /// wrong password
    decoy_digest: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        store_timeout: Duration,
    ) -> Self {
        Self {
            accounts,
            tokens,
            hasher,
            store_timeout,
            decoy_digest: Arc::new(OnceCell::new()),
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new account of `kind` with its first tokens stored inline
    pub async fn register(
        &self,
        kind: AccountKind,
        request: SignupRequest,
    ) -> Result<Account, AuthError> {
        if kind == AccountKind::Client && request.company.is_none() {
            return Err(AuthError::Validation("company is required".to_string()));
        }

        let directory = kind.directory();

        let by_email = with_timeout(
            self.store_timeout,
            self.accounts.count_by_email(directory, &request.email),
        )
        .await?;

        let by_contact = if directory == Directory::Clients {
            with_timeout(
                self.store_timeout,
                self.accounts.count_by_contact(directory, &request.contact),
            )
            .await?
        } else {
            0
        };

        if by_email > 0 || by_contact > 0 {
            tracing::debug!(email = %request.email, kind = kind.as_str(), "Duplicate registration rejected");
            return Err(AuthError::DuplicateAccount);
        }

        let password = self.hash_password(request.password).await?;

        let now = Utc::now();
        let mut account = Account {
            user_id: Uuid::new_v4().to_string(),
            user_type: kind,
            name: request.name,
            email: request.email,
            contact: request.contact,
            company: request.company,
            password,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };

        let issued = self.tokens.issue(&Identity::from(&account))?;
        account.token = Some(issued.access_token);
        account.refresh_token = issued.refresh_token;

        with_timeout(self.store_timeout, self.accounts.insert_account(&account))
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::DuplicateAccount,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %account.user_id, kind = kind.as_str(), "Account registered");

        Ok(account)
    }

    /// Verify credentials, rotate tokens and return the re-read account
    pub async fn login(
        &self,
        directory: Directory,
        request: LoginRequest,
    ) -> Result<Account, AuthError> {
        let found = with_timeout(
            self.store_timeout,
            self.accounts.find_by_email(directory, &request.email),
        )
        .await?;

        let Some(found) = found else {
            let decoy = self.decoy_digest().await?;
            self.verify_password(decoy, request.password).await?;
            tracing::debug!(directory = directory.as_str(), "Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(found.password.clone(), request.password).await? {
            tracing::debug!(user_id = %found.user_id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(&Identity::from(&found))?;
        self.sync_tokens(&found.user_id, &issued).await?;

        // The stored record is the source of truth for the current token
        let account = with_timeout(self.store_timeout, self.accounts.find_by_id(&found.user_id))
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        tracing::info!(user_id = %account.user_id, "Login succeeded");

        Ok(account)
    }

    /// Persist freshly issued tokens on an existing account
    ///
    /// Unlike an upsert this never creates a bare account for an unknown id.
    pub async fn sync_tokens(&self, user_id: &str, tokens: &IssuedTokens) -> Result<(), AuthError> {
        let updated = with_timeout(
            self.store_timeout,
            self.accounts.update_tokens(
                user_id,
                &tokens.access_token,
                tokens.refresh_token.as_deref(),
                Utc::now(),
            ),
        )
        .await?;

        if !updated {
            tracing::warn!(user_id = %user_id, "Token sync for unknown account");
            return Err(AuthError::AccountNotFound);
        }

        Ok(())
    }

    pub async fn account(&self, user_id: &str) -> Result<Account, AuthError> {
        with_timeout(self.store_timeout, self.accounts.find_by_id(user_id))
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Look up an account and require it to be of `kind`
    pub async fn account_of_kind(
        &self,
        user_id: &str,
        kind: AccountKind,
    ) -> Result<Account, AuthError> {
        let account = self.account(user_id).await?;
        if account.user_type != kind {
            return Err(AuthError::AccountNotFound);
        }
        Ok(account)
    }

    /// Round-trip to the account store, bounded like every other store call
    pub async fn ping(&self) -> Result<(), AuthError> {
        Ok(with_timeout(self.store_timeout, self.accounts.ping()).await?)
    }

    pub async fn accounts_of_kind(&self, kind: AccountKind) -> Result<Vec<Account>, AuthError> {
        Ok(with_timeout(self.store_timeout, self.accounts.list_by_kind(kind)).await?)
    }

    // bcrypt is CPU-bound, keep it off the async workers
    async fn hash_password(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(AuthError::from)
    }

    async fn decoy_digest(&self) -> Result<String, AuthError> {
        self.decoy_digest
            .get_or_try_init(|| self.hash_password(Uuid::new_v4().to_string()))
            .await
            .cloned()
    }

    async fn verify_password(&self, digest: String, candidate: String) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &candidate))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration as TokenTtl;

    fn service(store: Arc<MemoryStore>) -> AuthService {
        let tokens = Arc::new(TokenService::new(
            "test-secret",
            TokenTtl::hours(24),
            TokenTtl::hours(168),
        ));
        AuthService::new(store, tokens, PasswordHasher::new(4), Duration::from_secs(5))
    }

    fn signup(email: &str, contact: &str) -> SignupRequest {
        SignupRequest {
            name: "Ann".to_string(),
            email: email.to_string(),
            contact: contact.to_string(),
            password: "secret123".to_string(),
            company: Some("Acme".to_string()),
            user_type: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_and_token() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        let account = auth
            .register(AccountKind::User, signup("a@x.com", "1"))
            .await
            .unwrap();

        assert_ne!(account.password, "secret123");
        assert!(account.refresh_token.is_none());

        let claims = auth
            .tokens()
            .validate(account.token.as_deref().unwrap())
            .unwrap();
        assert_eq!(claims.identity.email, "a@x.com");
        assert_eq!(claims.identity.user_id, account.user_id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        auth.register(AccountKind::User, signup("a@x.com", "1"))
            .await
            .unwrap();
        let dup = auth
            .register(AccountKind::Admin, signup("a@x.com", "2"))
            .await;

        assert!(matches!(dup, Err(AuthError::DuplicateAccount)));
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_client_contact() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        auth.register(AccountKind::Client, signup("a@x.com", "555"))
            .await
            .unwrap();
        let dup = auth
            .register(AccountKind::Client, signup("b@x.com", "555"))
            .await;

        assert!(matches!(dup, Err(AuthError::DuplicateAccount)));
    }

    #[tokio::test]
    async fn test_client_requires_company() {
        let auth = service(Arc::new(MemoryStore::new()));
        let mut request = signup("a@x.com", "555");
        request.company = None;

        let result = auth.register(AccountKind::Client, request).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_keeps_token() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        let registered = auth
            .register(AccountKind::User, signup("a@x.com", "1"))
            .await
            .unwrap();

        let result = auth
            .login(Directory::Users, login("a@x.com", "wrong-password"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let stored = auth.account(&registered.user_id).await.unwrap();
        assert_eq!(stored.token, registered.token);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_generic() {
        let auth = service(Arc::new(MemoryStore::new()));
        let result = auth
            .login(Directory::Users, login("nobody@x.com", "secret123"))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(err.to_string(), "email or password not matched");
    }

    #[tokio::test]
    async fn test_login_unknown_email_still_runs_bcrypt() {
        let auth = service(Arc::new(MemoryStore::new()));
        assert!(auth.decoy_digest.get().is_none());

        let result = auth
            .login(Directory::Clients, login("nobody@x.com", "secret123"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // The miss was checked against a real bcrypt digest of the same cost
        let decoy = auth.decoy_digest.get().cloned().unwrap();
        assert!(decoy.starts_with("$2"));
        assert!(decoy.contains("$04$"));

        // Later misses reuse the same digest
        auth.login(Directory::Users, login("other@x.com", "secret123"))
            .await
            .unwrap_err();
        assert_eq!(auth.decoy_digest.get(), Some(&decoy));
    }

    #[tokio::test]
    async fn test_ping_reaches_store() {
        let auth = service(Arc::new(MemoryStore::new()));

        auth.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_login_rotates_client_tokens() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        let registered = auth
            .register(AccountKind::Client, signup("c@x.com", "555"))
            .await
            .unwrap();

        // Expiry has second resolution
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let account = auth
            .login(Directory::Clients, login("c@x.com", "secret123"))
            .await
            .unwrap();

        assert_ne!(account.token, registered.token);
        assert!(account.refresh_token.is_some());

        let claims = auth
            .tokens()
            .validate(account.token.as_deref().unwrap())
            .unwrap();
        assert_eq!(claims.identity, Identity::from(&account));
    }

    #[tokio::test]
    async fn test_login_is_scoped_to_directory() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        auth.register(AccountKind::Client, signup("c@x.com", "555"))
            .await
            .unwrap();

        let result = auth
            .login(Directory::Users, login("c@x.com", "secret123"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sync_tokens_unknown_account() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store.clone());

        let issued = IssuedTokens {
            access_token: "token".to_string(),
            refresh_token: None,
        };
        let result = auth.sync_tokens("missing", &issued).await;

        assert!(matches!(result, Err(AuthError::AccountNotFound)));
        assert_eq!(store.account_count().await, 0);
    }
}
