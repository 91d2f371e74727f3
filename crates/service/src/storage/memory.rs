use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use models::item::{ItemChanges, Model, NewItem};
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::item::repository::ItemRepository;

/// Process-local item store.
///
/// Mirrors the Postgres semantics (serial ids, server-side `created_at`)
/// so the HTTP layer can run without a database, e.g. in tests.
#[derive(Default)]
pub struct InMemoryItemRepository {
    inner: RwLock<Table>,
}

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Model>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn list(&self) -> Result<Vec<Model>, ServiceError> {
        let table = self.inner.read().await;
        let mut items: Vec<Model> = table.rows.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError> {
        let table = self.inner.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, item: NewItem) -> Result<Model, ServiceError> {
        let mut table = self.inner.write().await;
        table.last_id += 1;
        let model = Model {
            id: table.last_id,
            name: item.name,
            description: Some(item.description),
            created_at: Utc::now().naive_utc(),
        };
        table.rows.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i32, changes: ItemChanges) -> Result<Option<Model>, ServiceError> {
        let mut table = self.inner.write().await;
        let Some(row) = table.rows.get_mut(&id) else { return Ok(None); };
        if let Some(name) = changes.name { row.name = name; }
        if let Some(description) = changes.description { row.description = description; }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut table = self.inner.write().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
