pub mod config;
pub mod retry;
pub mod observability;
pub mod client;
pub mod proxy;
pub mod bootstrap;
