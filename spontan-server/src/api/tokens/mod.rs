//! Tokens API Module
//!
//! Balance queries, package purchases and purchase history.

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tokens", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/packages", get(handler::packages))
        .route("/{user_id}", get(handler::balance))
        .route("/{user_id}/purchase", post(handler::purchase))
        .route("/{user_id}/purchases", get(handler::history))
}
