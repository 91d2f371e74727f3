pub mod item_store;
