//! Chat API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::chat::parse_message;
use crate::core::ServerState;
use crate::utils::validation::{MAX_MESSAGE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ok};
use shared::models::OrderOptions;
use shared::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub drink: String,
    pub options: OrderOptions,
}

/// Parse a chat message into a drink intent
///
/// Gated by a balance pre-check: a user with no tokens is sent to the
/// top-up flow before any parsing happens.
pub async fn parse(
    State(state): State<ServerState>,
    Json(payload): Json<ParseRequest>,
) -> AppResult<Json<ApiResponse<ParseResponse>>> {
    validate_required_text(&payload.message, "message", MAX_MESSAGE_LEN)?;

    let balance = state.tokens.balance(&payload.user_id)?;
    if balance == 0 {
        return Err(AppError::InsufficientTokens);
    }

    let intent = parse_message(&payload.message)?;
    Ok(ok(ParseResponse {
        drink: intent.drink,
        options: intent.options,
    }))
}
