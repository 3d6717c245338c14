//! API handlers

pub mod accounts;
pub mod auth;
pub mod diary;
pub mod health;
pub mod requests;
