//! 统一错误处理
//!
//! Application-level error type and the mapping onto HTTP responses.
//! Every failure leaves the server as an [`ApiResponse`] envelope whose
//! `code` is the wire form of a [`shared::ErrorCode`], so clients can
//! branch on the code. The one that matters most is `E5001` (insufficient
//! tokens), which presentation layers turn into a redirect to the top-up
//! flow.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::auth::AuthError;
use crate::chat::ParseError;
use crate::orders::OrderError;
use crate::store::StorageError;
use crate::tokens::TokenError;
use shared::ErrorCode;
use shared::models::OrderStatus;
use shared::response::ApiResponse;

/// 应用错误枚举
///
/// Routine business conditions (insufficient balance, illegal transition,
/// code mismatch) are values, not panics; storage faults map to the 9xxx
/// fatal band and surface as a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Pickup code mismatch")]
    CodeMismatch,

    #[error("Insufficient tokens")]
    InsufficientTokens,

    #[error("Unknown token package: {0}")]
    InvalidPackage(String),

    #[error("No known drink found in the message")]
    UnrecognizedDrink,

    #[error("Invalid or expired event QR code")]
    InvalidQrCode,

    // ========== 认证错误 (4xx) ==========
    #[error("No code was requested for this phone")]
    OtpNotRequested,

    #[error("Code has expired")]
    OtpExpired,

    #[error("Incorrect code")]
    OtpInvalid,

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token")]
    SessionInvalid,

    // ========== 系统错误 (5xx) ==========
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::OrderNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorCode::OrderNotFound,
                format!("Order not found: {id}"),
            ),
            AppError::InvalidTransition { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidTransition,
                self.to_string(),
            ),
            AppError::CodeMismatch => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::PickupCodeMismatch,
                self.to_string(),
            ),
            AppError::InsufficientTokens => (
                StatusCode::PAYMENT_REQUIRED,
                ErrorCode::InsufficientTokens,
                self.to_string(),
            ),
            AppError::InvalidPackage(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidPackage, self.to_string())
            }
            AppError::UnrecognizedDrink => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::UnrecognizedDrink,
                self.to_string(),
            ),
            AppError::InvalidQrCode => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidQrCode,
                self.to_string(),
            ),
            AppError::OtpNotRequested => {
                (StatusCode::BAD_REQUEST, ErrorCode::OtpNotRequested, self.to_string())
            }
            AppError::OtpExpired => {
                (StatusCode::BAD_REQUEST, ErrorCode::OtpExpired, self.to_string())
            }
            AppError::OtpInvalid => {
                (StatusCode::BAD_REQUEST, ErrorCode::OtpInvalid, self.to_string())
            }
            AppError::SessionExpired => {
                (StatusCode::UNAUTHORIZED, ErrorCode::SessionExpired, self.to_string())
            }
            AppError::SessionInvalid => {
                (StatusCode::UNAUTHORIZED, ErrorCode::SessionInvalid, self.to_string())
            }
            AppError::Storage(msg) => {
                error!(target: "storage", error = %msg, "Storage error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageError,
                    "Storage error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalError,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(code.wire_code(), message));
        (status, body).into_response()
    }
}

// ========== Error conversions ==========

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Storage(inner) => AppError::Storage(inner.to_string()),
            TokenError::UserNotFound(id) => AppError::NotFound(format!("User not found: {id}")),
            TokenError::InsufficientTokens { .. } => AppError::InsufficientTokens,
            TokenError::InvalidPackage(id) => AppError::InvalidPackage(id),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Storage(inner) => AppError::Storage(inner.to_string()),
            OrderError::OrderNotFound(id) => AppError::OrderNotFound(id),
            OrderError::InvalidTransition { from, to } => {
                AppError::InvalidTransition { from, to }
            }
            OrderError::CodeMismatch => AppError::CodeMismatch,
            OrderError::Token(inner) => inner.into(),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Storage(inner) => AppError::Storage(inner.to_string()),
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::UserNotFound(id) => AppError::NotFound(format!("User not found: {id}")),
            AuthError::OtpNotRequested => AppError::OtpNotRequested,
            AuthError::OtpExpired => AppError::OtpExpired,
            AuthError::OtpInvalid => AppError::OtpInvalid,
            AuthError::SessionExpired => AppError::SessionExpired,
            AuthError::SessionInvalid => AppError::SessionInvalid,
        }
    }
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::UnrecognizedDrink => AppError::UnrecognizedDrink,
        }
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}
