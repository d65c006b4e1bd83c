//! Unified error codes for the Spontan backend
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 5xxx: Token errors
//! - 6xxx: Chat errors
//! - 7xxx: Event errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 1xxx: Auth ====================
    /// Session has expired
    SessionExpired = 1002,
    /// Session token is invalid
    SessionInvalid = 1003,
    /// No verification code was requested for this phone
    OtpNotRequested = 1004,
    /// Verification code expired
    OtpExpired = 1005,
    /// Verification code invalid
    OtpInvalid = 1006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status transition not allowed from the current status
    InvalidTransition = 4002,
    /// Pickup code did not match a ready order
    PickupCodeMismatch = 4003,

    // ==================== 5xxx: Token ====================
    /// Not enough tokens for the requested debit
    InsufficientTokens = 5001,
    /// Unknown token package id
    InvalidPackage = 5002,

    // ==================== 6xxx: Chat ====================
    /// No known drink found in the message
    UnrecognizedDrink = 6001,

    // ==================== 7xxx: Event ====================
    /// QR code does not belong to a registered event
    InvalidQrCode = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage layer error
    StorageError = 9002,
}

impl ErrorCode {
    /// Numeric value of the code
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Wire representation: `E` followed by the zero-padded numeric code
    pub fn wire_code(self) -> String {
        format!("E{:04}", self as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            1002 => Self::SessionExpired,
            1003 => Self::SessionInvalid,
            1004 => Self::OtpNotRequested,
            1005 => Self::OtpExpired,
            1006 => Self::OtpInvalid,
            4001 => Self::OrderNotFound,
            4002 => Self::InvalidTransition,
            4003 => Self::PickupCodeMismatch,
            5001 => Self::InsufficientTokens,
            5002 => Self::InvalidPackage,
            6001 => Self::UnrecognizedDrink,
            7001 => Self::InvalidQrCode,
            9001 => Self::InternalError,
            9002 => Self::StorageError,
            other => return Err(format!("unknown error code: {other}")),
        };
        Ok(code)
    }
}
