//! Owned items.

pub mod service;

pub use service::ItemService;
