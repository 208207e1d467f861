//! # userbase-cache
//!
//! Cache providers backing the revocation store and the user profile cache:
//!
//! - **memory**: in-process store. Plain values live in a
//!   [moka](https://crates.io/crates/moka) cache with per-entry TTL, sets in a
//!   `DashMap`.
//! - **redis**: Redis-backed store using the
//!   [redis](https://crates.io/crates/redis) crate.
//!
//! The provider is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
