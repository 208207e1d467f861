//! # userbase-service
//!
//! Business logic for user administration and owned items. Services take
//! their collaborators as `Arc` handles at construction time.

pub mod item;
pub mod pagination;
pub mod user;

pub use item::ItemService;
pub use pagination::Page;
pub use user::{NewUser, UserService};
