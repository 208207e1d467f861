//! PostgreSQL item repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_entity::item::{CreateItem, Item, UpdateItem};

use crate::directory::ItemStore;

/// Repository for owned items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Create a new item repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    /// Find an item by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find item", e))
    }

    /// Page through all items.
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY created_at ASC LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list items", e))
    }

    /// Page through the items of one owner.
    async fn list_by_owner(&self, owner_id: Uuid, offset: i64, limit: i64) -> AppResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE owner_id = $1 ORDER BY created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list items by owner", e)
        })
    }

    /// Insert an item owned by `owner_id`.
    async fn create(&self, owner_id: Uuid, data: &CreateItem) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items (title, description, owner_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create item", e))
    }

    /// Apply the non-empty fields of `data`.
    async fn update(&self, id: Uuid, data: &UpdateItem) -> AppResult<Option<Item>> {
        sqlx::query_as::<_, Item>(
            "UPDATE items SET title = COALESCE($2, title), \
             description = COALESCE($3, description), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update item", e))
    }

    /// Delete an item. Returns `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete item", e))?;
        Ok(result.rows_affected() > 0)
    }
}
