//! Check-in API Module
//!
//! Event check-in: QR lookup against the event registry plus a one-token
//! debit.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", post(handler::check_in))
}
