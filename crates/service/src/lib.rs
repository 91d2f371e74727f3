//! Service layer providing the item CRUD operations on top of models.
//! - Separates business rules (validation, not-found policy) from data access.
//! - Storage is pluggable behind `ItemRepository`: Postgres via SeaORM, or in-memory.

pub mod errors;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod db;
pub mod item;

pub use errors::ServiceError;
pub use item::{ItemRepository, ItemService, SeaOrmItemRepository};
pub use storage::memory::InMemoryItemRepository;
