//! Chat API Module
//!
//! Free-text drink parsing for the chat ordering flow.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/chat", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/parse", post(handler::parse))
}
