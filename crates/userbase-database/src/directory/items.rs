//! The `ItemStore` seam and its in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use userbase_core::result::AppResult;
use userbase_entity::item::{CreateItem, Item, UpdateItem};

/// Durable store of owned items.
#[async_trait]
pub trait ItemStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>>;

    /// Page through all items, oldest first.
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Item>>;

    /// Page through the items of one owner, oldest first.
    async fn list_by_owner(&self, owner_id: Uuid, offset: i64, limit: i64) -> AppResult<Vec<Item>>;

    async fn create(&self, owner_id: Uuid, data: &CreateItem) -> AppResult<Item>;

    /// Apply the present fields of `data`. `None` if the item does not exist.
    async fn update(&self, id: Uuid, data: &UpdateItem) -> AppResult<Option<Item>>;

    /// Returns `false` if the item did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// An `ItemStore` held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: DashMap<Uuid, Item>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn page(&self, pred: impl Fn(&Item) -> bool, offset: i64, limit: i64) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .iter()
            .filter(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|item| item.created_at);
        items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>> {
        Ok(self.items.get(&id).map(|item| item.clone()))
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Item>> {
        Ok(self.page(|_| true, offset, limit))
    }

    async fn list_by_owner(&self, owner_id: Uuid, offset: i64, limit: i64) -> AppResult<Vec<Item>> {
        Ok(self.page(|item| item.owner_id == owner_id, offset, limit))
    }

    async fn create(&self, owner_id: Uuid, data: &CreateItem) -> AppResult<Item> {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, data: &UpdateItem) -> AppResult<Option<Item>> {
        let Some(mut item) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &data.title {
            item.title = title.clone();
        }
        if let Some(description) = &data.description {
            item.description = description.clone();
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.items.remove(&id).is_some())
    }
}
