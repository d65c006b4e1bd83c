//! Orders API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ok};
use shared::models::{Order, OrderOptions, OrderStatus};
use shared::response::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub user_id: String,
    pub drink: String,
    #[serde(default)]
    pub options: Option<OrderOptions>,
}

/// Create an order (debits one token)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    validate_required_text(&payload.drink, "drink", MAX_NAME_LEN)?;

    let order = state.orders.create(
        &payload.user_id,
        &payload.drink,
        payload.options.unwrap_or_default(),
    )?;
    Ok(ok(order))
}

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Comma-separated status filter, e.g. `pending,preparing`
    pub status: Option<String>,
    pub user_id: Option<String>,
}

/// List orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let statuses = query
        .status
        .as_deref()
        .map(parse_status_filter)
        .transpose()?;

    let mut orders = state
        .orders
        .list(statuses.as_deref(), query.user_id.as_deref())?;
    // Ledger output is unordered; recency ordering is a display concern
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(ok(orders))
}

fn parse_status_filter(raw: &str) -> Result<Vec<OrderStatus>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<OrderStatus>()
                .map_err(AppError::Validation)
        })
        .collect()
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get(&id)?;
    Ok(ok(order))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Apply a status transition
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.transition(&id, payload.status)?;
    Ok(ok(order))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPickupRequest {
    pub code: String,
}

/// Verify a pickup code against ready orders
///
/// Returns the matching order without changing its status; the follow-up
/// `picked` transition is a separate call.
pub async fn verify_pickup(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyPickupRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;

    let order = state.orders.verify_pickup(&payload.code)?;
    Ok(ok(order))
}
