use std::sync::Arc;

use models::item::{ItemChanges, Model, NewItem};
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::item::repository::ItemRepository;

/// Item operations exposed by the item store.
/// Validation runs before any storage I/O.
#[derive(Clone)]
pub struct ItemService {
    repo: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(repo: Arc<dyn ItemRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Model>, ServiceError> {
        let items = self.repo.list().await?;
        info!(count = items.len(), "listed items");
        Ok(items)
    }

    pub async fn get(&self, id: i32) -> Result<Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::item_not_found(id))
    }

    #[instrument(skip(self, body))]
    pub async fn create(&self, body: &Value) -> Result<Model, ServiceError> {
        let new_item = NewItem::from_json(body)?;
        let created = self.repo.create(new_item).await?;
        info!(item_id = created.id, "item created");
        Ok(created)
    }

    #[instrument(skip(self, body))]
    pub async fn update(&self, id: i32, body: &Value) -> Result<Model, ServiceError> {
        let changes = ItemChanges::from_json(body)?;
        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| ServiceError::item_not_found(id))?;
        info!(item_id = id, "item updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::item_not_found(id));
        }
        info!(item_id = id, "item deleted");
        Ok(())
    }
}
