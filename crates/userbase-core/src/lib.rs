//! # userbase-core
//!
//! Core crate for userbase. Contains the configuration schema, the unified
//! error system, and the traits implemented by the cache and worker crates.
//!
//! This crate has **no** internal dependencies on other userbase crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
