//! Middleware: request tracing and the authentication gate

pub mod auth;
mod tracing;

pub use auth::{require_auth, AdminAccount, AuthenticatedAccount};
pub use tracing::request_tracing;
