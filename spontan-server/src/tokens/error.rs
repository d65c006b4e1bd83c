use crate::store::StorageError;
use thiserror::Error;

/// Token ledger errors
///
/// `InsufficientTokens` is its own variant so callers can route the user
/// to the purchase flow instead of showing a generic failure.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Insufficient tokens: balance {balance}, requested {requested}")]
    InsufficientTokens { balance: u32, requested: u32 },

    #[error("Unknown token package: {0}")]
    InvalidPackage(String),
}

pub type TokenResult<T> = Result<T, TokenError>;
