mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use common::{bearer, booking_body, create_document, tour_body};

const DATE: &str = "2026-12-01";

/// Seeds an active tour with `capacity` seats on [`DATE`].
async fn seed_tour(server: &TestServer, admin: &str, capacity: u32) -> i64 {
    create_document(
        server,
        admin,
        "tour-packages",
        tour_body("Merapi Sunrise", DATE, capacity),
    )
    .await["id"]
        .as_i64()
        .unwrap()
}

async fn available(server: &TestServer, tour_id: i64) -> u64 {
    server
        .get(&format!("/api/tour-packages/{tour_id}"))
        .await
        .json::<Value>()["dates"][0]["available"]
        .as_u64()
        .unwrap()
}

async fn book(server: &TestServer, token: &str, tour_id: i64, participants: u32) -> axum_test::TestResponse {
    server
        .post("/api/bookings")
        .add_header("Authorization", bearer(token))
        .json(&booking_body(tour_id, DATE, participants))
        .await
}

// ─── Creating bookings ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_booking_reserves_seats() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (user_id, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 10).await;

    let response = book(&server, &user, tour_id, 3).await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    assert_eq!(json["status"], "pending");
    assert_eq!(json["user_id"], user_id);
    assert_eq!(json["total_price"], 450000.0);
    assert_eq!(json["tour_package"]["id"], tour_id);
    assert_eq!(json["user"]["email"], "dewi@example.com");
    assert!(json["user"].get("password_hash").is_none());

    assert_eq!(available(&server, tour_id).await, 7);
}

#[tokio::test]
async fn test_overbooking_is_rejected() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 3).await;

    book(&server, &user, tour_id, 2)
        .await
        .assert_status(StatusCode::CREATED);

    let response = book(&server, &user, tour_id, 2).await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["details"]["available"], 1);
    assert_eq!(json["error"]["details"]["requested"], 2);

    assert_eq!(available(&server, tour_id).await, 1);
}

#[tokio::test]
async fn test_booking_unknown_date() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    let response = server
        .post("/api/bookings")
        .add_header("Authorization", bearer(&user))
        .json(&booking_body(tour_id, "2027-01-15", 1))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_booking_unknown_tour() {
    let (server, state) = common::make_server();
    let (_, user) = common::user_token(&state, "dewi@example.com").await;

    let response = book(&server, &user, 4040, 1).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_booking_inactive_tour() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;

    let mut body = tour_body("Closed Tour", DATE, 5);
    body["is_active"] = json!(false);
    let tour_id = create_document(&server, &admin, "tour-packages", body).await["id"]
        .as_i64()
        .unwrap();

    let response = book(&server, &user, tour_id, 1).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_booking_validation() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    let mut body = booking_body(tour_id, DATE, 0);
    body["contact_phone"] = json!("call me");

    let response = server
        .post("/api/bookings")
        .add_header("Authorization", bearer(&user))
        .json(&body)
        .await;

    response.assert_status_bad_request();
    let details = &response.json::<Value>()["error"]["details"];
    assert!(details.get("participants").is_some());
    assert!(details.get("contact_phone").is_some());
}

#[tokio::test]
async fn test_booking_requires_authentication() {
    let (server, _state) = common::make_server();

    let response = server
        .post("/api/bookings")
        .json(&booking_body(1, DATE, 1))
        .await;

    response.assert_status_unauthorized();
}

// ─── Listing and cancelling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_my_bookings_only_shows_own() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, dewi) = common::user_token(&state, "dewi@example.com").await;
    let (_, budi) = common::user_token(&state, "budi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 10).await;

    book(&server, &dewi, tour_id, 1).await;
    book(&server, &dewi, tour_id, 1).await;
    book(&server, &budi, tour_id, 1).await;

    let response = server
        .get("/api/bookings")
        .add_header("Authorization", bearer(&dewi))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["pagination"]["total_items"], 2);
    assert_eq!(json["items"][0]["tour_package"]["name"], "Merapi Sunrise");
}

#[tokio::test]
async fn test_cancel_restores_seats() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 4).await;

    let booking_id = book(&server, &user, tour_id, 4).await.json::<Value>()["id"]
        .as_i64()
        .unwrap();
    assert_eq!(available(&server, tour_id).await, 0);

    let response = server
        .post(&format!("/api/bookings/{booking_id}/cancel"))
        .add_header("Authorization", bearer(&user))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "cancelled");
    assert_eq!(available(&server, tour_id).await, 4);

    let response = server
        .post(&format!("/api/bookings/{booking_id}/cancel"))
        .add_header("Authorization", bearer(&user))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(available(&server, tour_id).await, 4);
}

#[tokio::test]
async fn test_cancel_someone_elses_booking() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, dewi) = common::user_token(&state, "dewi@example.com").await;
    let (_, budi) = common::user_token(&state, "budi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 4).await;

    let booking_id = book(&server, &dewi, tour_id, 1).await.json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let response = server
        .post(&format!("/api/bookings/{booking_id}/cancel"))
        .add_header("Authorization", bearer(&budi))
        .await;

    response.assert_status_forbidden();
    assert_eq!(available(&server, tour_id).await, 3);
}

#[tokio::test]
async fn test_cancel_missing_booking() {
    let (server, state) = common::make_server();
    let (_, user) = common::user_token(&state, "dewi@example.com").await;

    let response = server
        .post("/api/bookings/999/cancel")
        .add_header("Authorization", bearer(&user))
        .await;

    response.assert_status_not_found();
}

// ─── Administration ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_admin_status_lifecycle() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    let booking_id = book(&server, &user, tour_id, 2).await.json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let set_status = |status: &'static str| {
        server
            .patch(&format!("/api/admin/bookings/{booking_id}/status"))
            .add_header("Authorization", bearer(&admin))
            .json(&json!({ "status": status }))
    };

    let response = set_status("completed").await;
    response.assert_status(StatusCode::CONFLICT);

    let response = set_status("confirmed").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "confirmed");

    let response = set_status("completed").await;
    response.assert_status_ok();
    assert_eq!(available(&server, tour_id).await, 3);

    let response = set_status("cancelled").await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_lists_bookings_by_status() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 10).await;

    let first = book(&server, &user, tour_id, 1).await.json::<Value>()["id"]
        .as_i64()
        .unwrap();
    book(&server, &user, tour_id, 1).await;

    server
        .post(&format!("/api/bookings/{first}/cancel"))
        .add_header("Authorization", bearer(&user))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/admin/bookings?status=pending")
        .add_header("Authorization", bearer(&admin))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["pagination"]["total_items"], 1);
    assert_eq!(json["items"][0]["status"], "pending");

    let response = server
        .get("/api/admin/bookings")
        .add_header("Authorization", bearer(&admin))
        .await;
    assert_eq!(response.json::<Value>()["pagination"]["total_items"], 2);
}

#[tokio::test]
async fn test_admin_delete_releases_seats() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    let booking_id = book(&server, &user, tour_id, 5).await.json::<Value>()["id"]
        .as_i64()
        .unwrap();

    let response = server
        .get(&format!("/api/admin/bookings/{booking_id}"))
        .add_header("Authorization", bearer(&admin))
        .await;
    response.assert_status_ok();

    let response = server
        .delete(&format!("/api/admin/bookings/{booking_id}"))
        .add_header("Authorization", bearer(&admin))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert_eq!(available(&server, tour_id).await, 5);

    let response = server
        .get(&format!("/api/admin/bookings/{booking_id}"))
        .add_header("Authorization", bearer(&admin))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_admin_booking_routes_forbidden_for_users() {
    let (server, state) = common::make_server();
    let (_, user) = common::user_token(&state, "dewi@example.com").await;

    let response = server
        .get("/api/admin/bookings")
        .add_header("Authorization", bearer(&user))
        .await;

    response.assert_status_forbidden();
}

// ─── Editing tour packages ───────────────────────────────────────────────────

async fn put_tour(
    server: &TestServer,
    admin: &str,
    tour_id: i64,
    body: Value,
) -> axum_test::TestResponse {
    server
        .put(&format!("/api/admin/tour-packages/{tour_id}"))
        .add_header("Authorization", bearer(admin))
        .json(&body)
        .await
}

#[tokio::test]
async fn test_tour_edit_keeps_booked_seats() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    book(&server, &user, tour_id, 3)
        .await
        .assert_status(StatusCode::CREATED);

    // The form loaded before the booking still says 5 seats are free.
    let response = put_tour(
        &server,
        &admin,
        tour_id,
        tour_body("Merapi Sunrise Deluxe", DATE, 5),
    )
    .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["name"], "Merapi Sunrise Deluxe");
    assert_eq!(json["dates"][0]["available"], 2);
    assert_eq!(available(&server, tour_id).await, 2);

    book(&server, &user, tour_id, 3)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_tour_edit_grows_capacity_around_bookings() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    book(&server, &user, tour_id, 3)
        .await
        .assert_status(StatusCode::CREATED);

    put_tour(&server, &admin, tour_id, tour_body("Merapi Sunrise", DATE, 8))
        .await
        .assert_status_ok();

    assert_eq!(available(&server, tour_id).await, 5);
}

#[tokio::test]
async fn test_tour_edit_capacity_below_booked_seats() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    book(&server, &user, tour_id, 3)
        .await
        .assert_status(StatusCode::CREATED);

    let response =
        put_tour(&server, &admin, tour_id, tour_body("Merapi Sunrise", DATE, 2)).await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(json["error"]["details"]["booked"], 3);
    assert_eq!(available(&server, tour_id).await, 2);
}

#[tokio::test]
async fn test_tour_edit_cannot_drop_booked_date() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    book(&server, &user, tour_id, 1)
        .await
        .assert_status(StatusCode::CREATED);

    let response = put_tour(
        &server,
        &admin,
        tour_id,
        tour_body("Merapi Sunrise", "2026-12-08", 5),
    )
    .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(available(&server, tour_id).await, 4);
}

#[tokio::test]
async fn test_tour_edit_after_cancellation_frees_seats() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;
    let (_, user) = common::user_token(&state, "dewi@example.com").await;
    let tour_id = seed_tour(&server, &admin, 5).await;

    let booking = book(&server, &user, tour_id, 4).await.json::<Value>();
    server
        .post(&format!("/api/bookings/{}/cancel", booking["id"]))
        .add_header("Authorization", bearer(&user))
        .await
        .assert_status_ok();

    put_tour(&server, &admin, tour_id, tour_body("Merapi Sunrise", DATE, 3))
        .await
        .assert_status_ok();

    assert_eq!(available(&server, tour_id).await, 3);
}

#[tokio::test]
async fn test_tour_edit_missing_tour() {
    let (server, state) = common::make_server();
    let admin = common::admin_token(&state).await;

    put_tour(&server, &admin, 4242, tour_body("Ghost Tour", DATE, 5))
        .await
        .assert_status_not_found();
}
