use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address: {0}")]
    InvalidAddr(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("schema bootstrap failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
