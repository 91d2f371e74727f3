//! Storage backends for the service layer that do not need a database.

pub mod memory;
