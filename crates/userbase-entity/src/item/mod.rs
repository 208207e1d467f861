//! Owned item entities.

pub mod model;

pub use model::{CreateItem, Item, UpdateItem};
