//! REST API module.
//!
//! Success bodies are the bare resource; failures use the `AppError` JSON body.

mod requests;
mod users;

pub use requests::*;
pub use users::*;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Response type for all handlers.
pub type ApiResult<T> = Result<T, AppError>;

/// Confirmation body for operations without a resource to return.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
