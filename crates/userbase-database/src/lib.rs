//! # userbase-database
//!
//! PostgreSQL connection management, migrations, and the repositories for
//! users, items and background jobs.

pub mod connection;
pub mod directory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use directory::{ItemStore, UserDirectory};
