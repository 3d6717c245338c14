//! Diary Backend Library
//!
//! Account signup/login with JWT sessions, a token gate for protected
//! routes, and diary/admin-request document operations.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
