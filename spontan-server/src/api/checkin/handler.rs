//! Check-in API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ok};
use shared::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub user_id: String,
    pub qr_code: String,
}

#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub event_name: String,
}

/// Check a user into an event
///
/// The registry lookup is the external collaborator's call; the token
/// debit is the only core involvement. The debit happens after a
/// successful lookup so an invalid QR never costs a token.
pub async fn check_in(
    State(state): State<ServerState>,
    Json(payload): Json<CheckinRequest>,
) -> AppResult<Json<ApiResponse<CheckinResponse>>> {
    validate_required_text(&payload.qr_code, "qr_code", MAX_SHORT_TEXT_LEN)?;

    let event_name = state
        .events
        .lookup(&payload.qr_code)
        .ok_or(AppError::InvalidQrCode)?;

    state.tokens.try_debit(&payload.user_id, 1)?;
    tracing::info!(user_id = %payload.user_id, event_name, "Event check-in");

    Ok(ok(CheckinResponse {
        event_name: event_name.to_string(),
    }))
}
