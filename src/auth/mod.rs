//! Authentication module
//!
//! - bcrypt password hashing
//! - HS256 access/refresh token issuance and validation
//! - Registration, login and token persistence

mod jwt;
mod password;
mod service;

pub use jwt::{Claims, Identity, IssuedTokens, JwtError, RefreshClaims, TokenService};
pub use password::{PasswordError, PasswordHasher, DEFAULT_COST};
pub use service::{AuthError, AuthService};
