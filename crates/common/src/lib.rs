//! Pieces shared by the item store and the gateway: the JSON response
//! envelope, the error taxonomy and logging setup.

pub mod errors;
pub mod types;
pub mod utils;

pub use errors::{ApiError, ErrorKind};
pub use types::{Envelope, Health, Status};
