//! Auth API Module
//!
//! Interface to the mock identity provider: user create-or-fetch, OTP
//! send/verify, session verification, logout and the payment-method flag.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/start", post(handler::start))
        .route("/otp/send", post(handler::send_otp))
        .route("/otp/verify", post(handler::verify_otp))
        .route("/session/verify", post(handler::verify_session))
        .route("/logout", post(handler::logout))
        .route("/payment-method", post(handler::add_payment_method))
}
