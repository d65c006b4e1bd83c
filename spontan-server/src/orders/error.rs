use crate::store::StorageError;
use crate::tokens::TokenError;
use shared::models::OrderStatus;
use thiserror::Error;

/// Order ledger errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Pickup code mismatch")]
    CodeMismatch,

    /// Token-ledger failures bubble up unchanged so the caller can tell
    /// an insufficient balance from everything else
    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type OrderResult<T> = Result<T, OrderError>;
