pub mod repository;
pub mod service;

pub use repository::{ItemRepository, SeaOrmItemRepository};
pub use service::ItemService;
