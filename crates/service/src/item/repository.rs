use async_trait::async_trait;
use models::item::{ItemChanges, Model, NewItem};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

/// Persistence seam for items. Input is already validated.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items, newest first.
    async fn list(&self) -> Result<Vec<Model>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError>;
    async fn create(&self, item: NewItem) -> Result<Model, ServiceError>;
    /// `Ok(None)` when no item has this id.
    async fn update(&self, id: i32, changes: ItemChanges) -> Result<Option<Model>, ServiceError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmItemRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmItemRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ItemRepository for SeaOrmItemRepository {
    async fn list(&self) -> Result<Vec<Model>, ServiceError> {
        crate::db::item_store::list_items(&self.db).await
    }

    async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError> {
        crate::db::item_store::get_item(&self.db, id).await
    }

    async fn create(&self, item: NewItem) -> Result<Model, ServiceError> {
        crate::db::item_store::create_item(&self.db, item).await
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> Result<Option<Model>, ServiceError> {
        crate::db::item_store::update_item(&self.db, id, changes).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        crate::db::item_store::delete_item(&self.db, id).await
    }
}
