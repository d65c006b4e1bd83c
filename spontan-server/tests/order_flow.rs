//! End-to-end flow over the assembled router
//!
//! Drives the HTTP surface the way the SPA does: register, top up,
//! parse a chat message, place the order, walk it through the barman
//! transitions and confirm pickup.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use spontan_server::core::{Config, ServerState, router};

fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).expect("state");
    (router(state), dir)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_user(app: &Router) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/start",
        Some(json!({"name": "Ana", "email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app();
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_full_order_flow() {
    let (app, _dir) = test_app();
    let user_id = register_user(&app).await;

    // No tokens yet: the chat gate redirects to the top-up flow
    let (status, body) = call(
        &app,
        "POST",
        "/api/chat/parse",
        Some(json!({"user_id": user_id, "message": "un mojito"})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "E5001");

    // Buy the 50 package
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/tokens/{user_id}/purchase"),
        Some(json!({"package_id": "50"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 50);
    assert_eq!(body["data"]["bonus_tokens"], 0);

    let (_, body) = call(&app, "GET", &format!("/api/tokens/{user_id}"), None).await;
    assert_eq!(body["data"]["tokens"], 50);

    // Parse the canonical chat message
    let (status, body) = call(
        &app,
        "POST",
        "/api/chat/parse",
        Some(json!({"user_id": user_id, "message": "Aș dori un mojito mare fără gheață"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["drink"], "Mojito");
    assert_eq!(body["data"]["options"]["size"], "large");
    assert_eq!(body["data"]["options"]["ice"], false);

    // Place the order
    let (status, body) = call(
        &app,
        "POST",
        "/api/orders",
        Some(json!({
            "user_id": user_id,
            "drink": body["data"]["drink"],
            "options": body["data"]["options"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let pickup_code = body["data"]["pickup_code"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(pickup_code.len(), 6);

    // One token spent on creation
    let (_, body) = call(&app, "GET", &format!("/api/tokens/{user_id}"), None).await;
    assert_eq!(body["data"]["tokens"], 49);

    // Skipping preparing is rejected, and the pair is named
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/status"),
        Some(json!({"status": "ready"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E4002");
    assert!(body["message"].as_str().unwrap().contains("pending"));
    assert!(body["message"].as_str().unwrap().contains("ready"));

    // Barman walks the legal path
    for status_name in ["preparing", "ready"] {
        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({"status": status_name})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], status_name);
    }

    // Wrong code is a mismatch
    let (status, body) = call(
        &app,
        "POST",
        "/api/orders/pickup/verify",
        Some(json!({"code": "WRONG1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E4003");

    // The issued code verifies without changing state
    let (status, body) = call(
        &app,
        "POST",
        "/api/orders/pickup/verify",
        Some(json!({"code": pickup_code})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], order_id.as_str());
    assert_eq!(body["data"]["status"], "ready");

    // Hand over and close out
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/orders/{order_id}/status"),
        Some(json!({"status": "picked"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "picked");

    // Terminal orders release their code
    let (status, _) = call(
        &app,
        "POST",
        "/api/orders/pickup/verify",
        Some(json!({"code": pickup_code})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // History keeps the picked order
    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/orders?user_id={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "picked");
}

#[tokio::test]
async fn test_barman_list_filter() {
    let (app, _dir) = test_app();
    let user_id = register_user(&app).await;

    call(
        &app,
        "POST",
        &format!("/api/tokens/{user_id}/purchase"),
        Some(json!({"package_id": "100"})),
    )
    .await;

    for drink in ["Bere", "Vin", "Mojito"] {
        let (status, _) = call(
            &app,
            "POST",
            "/api/orders",
            Some(json!({"user_id": user_id, "drink": drink})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // The barman dashboard polls for open work only
    let (status, body) = call(
        &app,
        "GET",
        "/api/orders?status=pending,preparing,ready",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = call(&app, "GET", "/api/orders?status=cancelled", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = call(&app, "GET", "/api/orders?status=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");
}

#[tokio::test]
async fn test_checkin_flow() {
    let (app, _dir) = test_app();
    let user_id = register_user(&app).await;

    // Invalid QR never costs a token
    let (status, body) = call(
        &app,
        "POST",
        "/api/checkin",
        Some(json!({"user_id": user_id, "qr_code": "NOT-AN-EVENT"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E7001");

    // Valid QR with no balance surfaces the distinguishable condition
    let (status, body) = call(
        &app,
        "POST",
        "/api/checkin",
        Some(json!({"user_id": user_id, "qr_code": "EVT-001"})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["code"], "E5001");

    call(
        &app,
        "POST",
        &format!("/api/tokens/{user_id}/purchase"),
        Some(json!({"package_id": "50"})),
    )
    .await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/checkin",
        Some(json!({"user_id": user_id, "qr_code": "EVT-001"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["event_name"], "Summer Vibes Party @ Club Spontan");

    let (_, body) = call(&app, "GET", &format!("/api/tokens/{user_id}"), None).await;
    assert_eq!(body["data"]["tokens"], 49);
}

#[tokio::test]
async fn test_purchase_history_and_bonus() {
    let (app, _dir) = test_app();
    let user_id = register_user(&app).await;

    for package in ["50", "500"] {
        let (status, _) = call(
            &app,
            "POST",
            &format!("/api/tokens/{user_id}/purchase"),
            Some(json!({"package_id": package})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    // 50 + 500 + 25 bonus
    let (_, body) = call(&app, "GET", &format!("/api/tokens/{user_id}"), None).await;
    assert_eq!(body["data"]["tokens"], 575);

    // Newest first
    let (_, body) = call(&app, "GET", &format!("/api/tokens/{user_id}/purchases"), None).await;
    let purchases = body["data"].as_array().unwrap();
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0]["package_id"], "500");
    assert_eq!(purchases[0]["bonus_tokens"], 25);
    assert_eq!(purchases[1]["package_id"], "50");

    // Unknown package leaves everything unchanged
    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/tokens/{user_id}/purchase"),
        Some(json!({"package_id": "999"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E5002");

    let (_, body) = call(&app, "GET", &format!("/api/tokens/{user_id}"), None).await;
    assert_eq!(body["data"]["tokens"], 575);
}

#[tokio::test]
async fn test_auth_surface() {
    let (app, _dir) = test_app();

    // Missing email is a validation failure
    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/start",
        Some(json!({"name": "Ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // Short phone is rejected before any OTP is issued
    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/otp/send",
        Some(json!({"phone": "0712"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/otp/send",
        Some(json!({"phone": "0712345678"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A wrong guess does not open a session
    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/otp/verify",
        Some(json!({"phone": "0712345678", "code": "0000"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E1006");

    // Unknown session tokens are rejected
    let (status, body) = call(
        &app,
        "POST",
        "/api/auth/session/verify",
        Some(json!({"token": "not-a-session"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E1003");
}
