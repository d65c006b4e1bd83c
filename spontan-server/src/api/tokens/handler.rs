//! Tokens API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::{AppResult, ok};
use shared::models::{TOKEN_PACKAGES, TokenPackage, TokenPurchase};
use shared::response::ApiResponse;

/// The fixed package price list
pub async fn packages() -> Json<ApiResponse<&'static [TokenPackage]>> {
    ok(TOKEN_PACKAGES)
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub tokens: u32,
}

/// Current token balance for a user
pub async fn balance(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<BalanceResponse>>> {
    let tokens = state.tokens.balance(&user_id)?;
    Ok(ok(BalanceResponse { tokens }))
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub package_id: String,
}

/// Purchase a token package
pub async fn purchase(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    Json(payload): Json<PurchaseRequest>,
) -> AppResult<Json<ApiResponse<TokenPurchase>>> {
    let purchase = state.tokens.credit(&user_id, &payload.package_id)?;
    Ok(ok(purchase))
}

/// Purchase history for a user, newest first
pub async fn history(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<TokenPurchase>>>> {
    let mut purchases = state.tokens.purchases(&user_id)?;
    // Ledger order is oldest-first; the view wants the latest on top
    purchases.reverse();
    Ok(ok(purchases))
}
