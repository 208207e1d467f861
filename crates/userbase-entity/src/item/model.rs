//! Item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A resource owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    /// Unique item identifier.
    pub id: Uuid,
    /// Short title (at most 100 characters).
    pub title: String,
    /// Description (at most 200 characters).
    pub description: String,
    /// Owning user.
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Whether `user_id` owns this item.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Data required to create an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    pub title: String,
    pub description: String,
}

/// Fields that may change on an existing item. `None` keeps the old value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItem {
    pub title: Option<String>,
    pub description: Option<String>,
}
