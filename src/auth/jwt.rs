//! JWT token generation and validation
//!
//! Access tokens carry the account identity; refresh tokens carry only an
//! expiry, so they cannot be used to re-derive who they were issued to.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Account, AccountKind};

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// Identity fields embedded in an access token
///
/// Field names on the wire keep the casing existing clients read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "User_id")]
    pub user_id: String,
    #[serde(rename = "User_type")]
    pub user_type: AccountKind,
    #[serde(rename = "Company", default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(rename = "Contact", default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        // Only clients carry company/contact in their claims
        let (company, contact) = match account.user_type {
            AccountKind::Client => (account.company.clone(), Some(account.contact.clone())),
            AccountKind::User | AccountKind::Admin => (None, None),
        };

        Self {
            email: account.email.clone(),
            name: account.name.clone(),
            user_id: account.user_id.clone(),
            user_type: account.user_type,
            company,
            contact,
        }
    }
}

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: Identity,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Refresh token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub exp: i64,
}

/// Tokens minted for one login or registration
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Signs and verifies tokens under one shared HS256 secret
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue an access token, plus a refresh token for kinds that get one
    pub fn issue(&self, identity: &Identity) -> Result<IssuedTokens, JwtError> {
        let now = Utc::now();

        let claims = Claims {
            identity: identity.clone(),
            exp: expiry(now, self.access_ttl)?,
        };
        let access_token = self.sign(&claims)?;

        let refresh_token = if identity.user_type.issues_refresh_token() {
            let refresh = RefreshClaims {
                exp: expiry(now, self.refresh_ttl)?,
            };
            Some(self.sign(&refresh)?)
        } else {
            None
        };

        Ok(IssuedTokens {
            access_token,
            refresh_token,
        })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify an access token and return its claims
    ///
    /// A token whose `exp` lies strictly before now is rejected; there is no
    /// leeway. Refresh tokens fail here because they lack the identity fields.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> Result<i64, JwtError> {
    now.checked_add_signed(ttl)
        .map(|at| at.timestamp())
        .ok_or_else(|| JwtError::EncodingFailed(format!("token lifetime {} overflows", ttl)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key";

    fn tokens() -> TokenService {
        TokenService::new(SECRET, Duration::hours(24), Duration::hours(168))
    }

    fn create_identity(user_type: AccountKind) -> Identity {
        Identity {
            email: "a@x.com".to_string(),
            name: "Ann".to_string(),
            user_id: "0f5d3a52-6c8e-4a0e-9a57-3f4a1c2b9d10".to_string(),
            user_type,
            company: None,
            contact: None,
        }
    }

    #[test]
    fn test_oversized_lifetime_fails_the_issue_call() {
        let service = TokenService::new(SECRET, Duration::hours(10_000_000_000), Duration::hours(1));

        let result = service.issue(&create_identity(AccountKind::User));
        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));

        let refresh_only = TokenService::new(SECRET, Duration::hours(1), Duration::hours(10_000_000_000));
        let result = refresh_only.issue(&create_identity(AccountKind::Client));
        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let identity = create_identity(AccountKind::User);
        let issued = tokens().issue(&identity).unwrap();

        assert!(issued.refresh_token.is_none());

        let claims = tokens().validate(&issued.access_token).unwrap();
        assert_eq!(claims.identity, identity);

        let expected_exp = (Utc::now() + Duration::hours(24)).timestamp();
        assert!((claims.exp - expected_exp).abs() <= 5);
    }

    #[test]
    fn test_client_tokens_carry_company_and_refresh() {
        let mut identity = create_identity(AccountKind::Client);
        identity.company = Some("Acme".to_string());
        identity.contact = Some("555-0100".to_string());

        let issued = tokens().issue(&identity).unwrap();
        let refresh = issued.refresh_token.expect("client gets a refresh token");

        let claims = tokens().validate(&issued.access_token).unwrap();
        assert_eq!(claims.identity.company.as_deref(), Some("Acme"));
        assert_eq!(claims.identity.contact.as_deref(), Some("555-0100"));

        // Refresh token has no identity, so it never passes as an access token
        assert!(matches!(
            tokens().validate(&refresh),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_wire_claim_names() {
        let mut identity = create_identity(AccountKind::Client);
        identity.company = Some("Acme".to_string());
        let claims = Claims {
            identity,
            exp: 1_700_000_000,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["Email"], "a@x.com");
        assert_eq!(json["Name"], "Ann");
        assert_eq!(json["User_type"], "CLIENT");
        assert_eq!(json["Company"], "Acme");
        assert_eq!(json["exp"], 1_700_000_000);
        assert!(json.get("User_id").is_some());
        assert!(json.get("Contact").is_none());
    }

    #[test]
    fn test_expired_token() {
        let expired = TokenService::new(SECRET, Duration::seconds(-10), Duration::hours(168));
        let issued = expired.issue(&create_identity(AccountKind::User)).unwrap();

        assert!(matches!(
            tokens().validate(&issued.access_token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let other = TokenService::new("secret2", Duration::hours(24), Duration::hours(168));
        let issued = other.issue(&create_identity(AccountKind::Admin)).unwrap();

        assert!(matches!(
            tokens().validate(&issued.access_token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_payload() {
        let service = tokens();
        let original = service.issue(&create_identity(AccountKind::User)).unwrap();

        let mut other_identity = create_identity(AccountKind::Admin);
        other_identity.email = "mallory@x.com".to_string();
        let other = service.issue(&other_identity).unwrap();

        // Splice the second token's payload under the first token's signature
        let a: Vec<&str> = original.access_token.split('.').collect();
        let b: Vec<&str> = other.access_token.split('.').collect();
        let forged = format!("{}.{}.{}", a[0], b[1], a[2]);

        assert!(service.validate(&forged).is_err());
    }

    #[test]
    fn test_tampered_signature() {
        let service = tokens();
        let issued = service.issue(&create_identity(AccountKind::User)).unwrap();

        let (head, signature) = issued.access_token.rsplit_once('.').unwrap();
        let mut sig: Vec<char> = signature.chars().collect();
        let mid = sig.len() / 2;
        sig[mid] = if sig[mid] == 'A' { 'B' } else { 'A' };
        let forged = format!("{}.{}", head, sig.into_iter().collect::<String>());

        assert!(service.validate(&forged).is_err());
    }

    #[test]
    fn test_invalid_token() {
        assert!(matches!(
            tokens().validate("invalid.token.here"),
            Err(JwtError::Malformed(_))
        ));
    }
}
