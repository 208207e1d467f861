//! # userbase-entity
//!
//! Domain entity models. Every struct here is either a table row
//! (`sqlx::FromRow`) or the input used to create one.

pub mod item;
pub mod job;
pub mod user;
