//! Shared types for the Spontan backend
//!
//! Common types used by the server and its clients: domain models,
//! error codes, response structures, and utility helpers.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::ErrorCode;
pub use response::{API_CODE_SUCCESS, ApiResponse};
