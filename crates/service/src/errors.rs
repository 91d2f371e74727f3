use common::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn item_not_found(id: i32) -> Self { Self::NotFound(format!("item with id {} not found", id)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => ApiError::invalid_input(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Db(msg) => ApiError::internal(msg),
        }
    }
}
