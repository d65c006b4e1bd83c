//! Orders API Module
//!
//! Order creation, listing, status transitions (barman dashboard) and
//! pickup-code verification.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::update_status))
        .route("/pickup/verify", post(handler::verify_pickup))
}
