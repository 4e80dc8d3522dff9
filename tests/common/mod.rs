#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use tourism_portal::application::services::NewAccount;
use tourism_portal::infrastructure::memory::MemoryStore;
use tourism_portal::routes::router;
use tourism_portal::state::{AppState, CookieSettings};
use tourism_portal::utils::jwt::JwtCodec;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn create_test_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState::new(
        store.clone(),
        store,
        JwtCodec::new("test-jwt-secret", 3600),
        CookieSettings::default(),
    )
}

/// Full router over a fresh in-memory store, without rate limiting.
pub fn make_server() -> (TestServer, AppState) {
    let state = create_test_state();
    let server = TestServer::new(router(state.clone(), false)).unwrap();
    (server, state)
}

/// Creates an administrator directly through the service and signs in.
pub async fn admin_token(state: &AppState) -> String {
    state
        .auth_service
        .create_admin(NewAccount {
            name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: PASSWORD.to_string(),
            phone: None,
        })
        .await
        .unwrap();

    state
        .auth_service
        .login(ADMIN_EMAIL, PASSWORD)
        .await
        .unwrap()
        .token
}

/// Registers a visitor and returns `(user_id, token)`.
pub async fn user_token(state: &AppState, email: &str) -> (i64, String) {
    let session = state
        .auth_service
        .register(NewAccount {
            name: "Visitor".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            phone: None,
        })
        .await
        .unwrap();

    (session.user["id"].as_i64().unwrap(), session.token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Creates a document through the admin API and returns its JSON.
pub async fn create_document(server: &TestServer, token: &str, path: &str, body: Value) -> Value {
    let response = server
        .post(&format!("/api/admin/{path}"))
        .add_header("Authorization", bearer(token))
        .json(&body)
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub fn tour_body(name: &str, date: &str, capacity: u32) -> Value {
    json!({
        "name": name,
        "description": "Jeep tour at dawn",
        "price_per_person": 150000.0,
        "duration_days": 1,
        "itinerary": ["Pickup", "Sunrise", "Breakfast"],
        "dates": [{ "date": date, "capacity": capacity, "available": capacity }]
    })
}

pub fn booking_body(tour_id: i64, date: &str, participants: u32) -> Value {
    json!({
        "tour_package_id": tour_id,
        "tour_date": date,
        "participants": participants,
        "contact_name": "Dewi",
        "contact_phone": "+628123456789"
    })
}
