//! Session lifecycle over the refresh-token registry.

pub mod manager;

pub use manager::{AuthSessionManager, TokenPair};
