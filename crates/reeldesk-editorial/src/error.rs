//! Editorial error types.

use thiserror::Error;

pub type EditorialResult<T> = Result<T, EditorialError>;

#[derive(Debug, Error)]
pub enum EditorialError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Store error: {0}")]
    Store(#[from] reeldesk_store::StoreError),
}

impl EditorialError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }
}
