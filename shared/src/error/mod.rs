//! Unified error types for the Spontan backend
//!
//! Error codes cross the wire as `Exxxx` strings inside the
//! [`ApiResponse`](crate::response::ApiResponse) envelope. The server maps
//! its internal error enums onto [`ErrorCode`] at the HTTP boundary.

mod codes;

pub use codes::ErrorCode;
