//! Core traits defined in `userbase-core` and implemented by other crates.

pub mod cache;
pub mod dispatcher;

pub use cache::CacheProvider;
pub use dispatcher::{EmailDispatcher, EmailMessage, EnqueueOptions};
