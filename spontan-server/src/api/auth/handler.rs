//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppResult, ok};
use shared::models::User;
use shared::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Create-or-fetch a user record
pub async fn start(
    State(state): State<ServerState>,
    Json(payload): Json<StartRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    let user = state.auth.start(payload.name, payload.email, payload.phone)?;
    Ok(ok(user))
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
}

/// Issue an OTP for a phone number (mock SMS delivery)
pub async fn send_otp(
    State(state): State<ServerState>,
    Json(payload): Json<SendOtpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    validate_required_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    state.auth.send_otp(&payload.phone)?;
    Ok(ok(()))
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub user: User,
    pub session_token: String,
}

/// Verify an OTP and open a session
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<VerifyOtpResponse>>> {
    let (user, session_token) = state.auth.verify_otp(&payload.phone, &payload.code)?;
    Ok(ok(VerifyOtpResponse {
        user,
        session_token,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub token: String,
}

/// Resolve a session token to its user
pub async fn verify_session(
    State(state): State<ServerState>,
    Json(payload): Json<SessionRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user = state.auth.verify_session(&payload.token)?;
    Ok(ok(user))
}

/// Invalidate a session
pub async fn logout(
    State(state): State<ServerState>,
    Json(payload): Json<SessionRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.auth.logout(&payload.token);
    Ok(ok(()))
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub user_id: String,
    pub number: String,
    pub name: String,
    pub cvv: String,
    pub expiry: String,
}

/// Register a payment method (mock: validates the form, flips the flag)
pub async fn add_payment_method(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentMethodRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    validate_required_text(&payload.number, "number", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.cvv, "cvv", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.expiry, "expiry", MAX_SHORT_TEXT_LEN)?;

    let user = state.auth.mark_payment_verified(&payload.user_id)?;
    Ok(ok(user))
}
