//! Item CRUD with owner-or-superuser access control.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use userbase_core::error::AppError;
use userbase_core::result::AppResult;
use userbase_database::ItemStore;
use userbase_entity::item::{CreateItem, Item, UpdateItem};
use userbase_entity::user::User;

use crate::pagination::Page;

/// Handles item operations on behalf of an authenticated user.
#[derive(Debug, Clone)]
pub struct ItemService {
    items: Arc<dyn ItemStore>,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(items: Arc<dyn ItemStore>) -> Self {
        Self { items }
    }

    /// Create an item owned by `owner`.
    pub async fn create_with_owner(&self, owner: &User, data: CreateItem) -> AppResult<Item> {
        let item = self.items.create(owner.id, &data).await?;
        info!(user_id = %owner.id, item_id = %item.id, "Item created");
        Ok(item)
    }

    /// Super users see every item; everyone else sees their own.
    pub async fn list(&self, actor: &User, page: Page) -> AppResult<Vec<Item>> {
        let (offset, limit) = page.normalize();
        if actor.is_super_user {
            self.items.list(offset, limit).await
        } else {
            self.items.list_by_owner(actor.id, offset, limit).await
        }
    }

    /// Fetch one item the actor may access.
    pub async fn get(&self, actor: &User, id: Uuid) -> AppResult<Item> {
        let item = self
            .items
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        if !actor.is_super_user && !item.is_owned_by(actor.id) {
            return Err(AppError::forbidden("Not enough privileges"));
        }
        Ok(item)
    }

    pub async fn update(&self, actor: &User, id: Uuid, changes: UpdateItem) -> AppResult<Item> {
        let item = self.get(actor, id).await?;
        let updated = self
            .items
            .update(item.id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))?;

        info!(user_id = %actor.id, item_id = %id, "Item updated");
        Ok(updated)
    }

    /// Delete an item and return it as it was.
    pub async fn delete(&self, actor: &User, id: Uuid) -> AppResult<Item> {
        let item = self.get(actor, id).await?;
        if !self.items.delete(item.id).await? {
            return Err(AppError::not_found("Item not found"));
        }

        info!(user_id = %actor.id, item_id = %id, "Item deleted");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use userbase_core::error::ErrorKind;
    use userbase_database::directory::InMemoryItemStore;

    use super::*;

    fn user(is_super_user: bool) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "someone".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password: String::new(),
            created_at: now,
            updated_at: now,
            is_active: true,
            is_super_user,
            verified: true,
            verification_code: None,
            password_reset_token: None,
            password_reset_at: None,
        }
    }

    fn new_item() -> CreateItem {
        CreateItem {
            title: "Notebook".to_string(),
            description: "Paper".to_string(),
        }
    }

    #[tokio::test]
    async fn test_owner_and_super_user_access() {
        let service = ItemService::new(Arc::new(InMemoryItemStore::new()));
        let owner = user(false);
        let stranger = user(false);
        let admin = user(true);

        let item = service.create_with_owner(&owner, new_item()).await.unwrap();

        assert_eq!(service.get(&owner, item.id).await.unwrap().id, item.id);
        assert_eq!(service.get(&admin, item.id).await.unwrap().id, item.id);

        let err = service.get(&stranger, item.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        let err = service
            .update(&stranger, item.id, UpdateItem::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        let err = service.delete(&stranger, item.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_list_scopes_by_role() {
        let service = ItemService::new(Arc::new(InMemoryItemStore::new()));
        let ann = user(false);
        let bob = user(false);
        let admin = user(true);
        service.create_with_owner(&ann, new_item()).await.unwrap();
        service.create_with_owner(&bob, new_item()).await.unwrap();

        assert_eq!(service.list(&ann, Page::default()).await.unwrap().len(), 1);
        assert_eq!(service.list(&admin, Page::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = ItemService::new(Arc::new(InMemoryItemStore::new()));
        let owner = user(false);
        let item = service.create_with_owner(&owner, new_item()).await.unwrap();

        let deleted = service.delete(&owner, item.id).await.unwrap();
        assert_eq!(deleted.id, item.id);

        let err = service.get(&owner, item.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
