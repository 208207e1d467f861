//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod item;
pub mod user;
