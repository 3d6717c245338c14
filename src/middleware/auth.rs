//! Authentication middleware
//!
//! `require_auth` gates a router: it validates the token in the
//! `Authorization` header and stores the caller's identity in the request
//! extensions. Handlers read that identity through the extractors below.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{Claims, TokenService};
use crate::error::ApiError;
use crate::models::AccountKind;

/// Identity of the caller, taken from a validated access token
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub kind: AccountKind,
    pub company: Option<String>,
    pub contact: Option<String>,
}

impl From<Claims> for AuthenticatedAccount {
    fn from(claims: Claims) -> Self {
        let identity = claims.identity;
        Self {
            user_id: identity.user_id,
            email: identity.email,
            name: identity.name,
            kind: identity.user_type,
            company: identity.company,
            contact: identity.contact,
        }
    }
}

/// Pull the token out of the header value
///
/// The raw token is the expected form; a `Bearer ` prefix is stripped if a
/// client sends one.
fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim_start();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();

    (!token.is_empty()).then_some(token)
}

/// Reject the request unless it carries a valid access token
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_header)
    else {
        return ApiError::Unauthorized("missing authorization token".to_string()).into_response();
    };

    let claims = match tokens.validate(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, path = %request.uri().path(), "Token rejected");
            return ApiError::from(e).into_response();
        }
    };

    request
        .extensions_mut()
        .insert(AuthenticatedAccount::from(claims));

    next.run(request).await
}

/// Extractor for the authenticated caller
///
/// Only works on routes behind `require_auth`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(caller: AuthenticatedAccount) -> impl IntoResponse {
///     format!("Hello, {}", caller.name)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))
    }
}

/// Extractor that additionally requires the `ADMIN` account kind
#[derive(Debug, Clone)]
pub struct AdminAccount(pub AuthenticatedAccount);

#[async_trait]
impl<S> FromRequestParts<S> for AdminAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let caller = AuthenticatedAccount::from_request_parts(parts, state).await?;

        if caller.kind != AccountKind::Admin {
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(AdminAccount(caller))
    }
}
