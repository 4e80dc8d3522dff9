//! Handlers for booking endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use validator::Validate;

use crate::api::dto::booking::{BookingListParams, CreateBookingRequest, UpdateStatusRequest};
use crate::api::dto::pagination::{ListResponse, PaginationParams};
use crate::api::extract::JsonBody;
use crate::application::services::AuthUser;
use crate::domain::entities::TourPackage;
use crate::error::AppError;
use crate::state::AppState;

/// Books seats on a tour date for the caller.
///
/// # Endpoint
///
/// `POST /api/bookings`
///
/// # Request Body
///
/// ```json
/// {
///   "tour_package_id": 3,
///   "tour_date": "2026-12-01",
///   "participants": 2,
///   "contact_name": "Dewi",
///   "contact_phone": "+628123456789",
///   "notes": "Vegetarian lunch"
/// }
/// ```
///
/// # Errors
///
/// - 400: invalid body, inactive tour or date not offered
/// - 404: tour package does not exist
/// - 409: not enough seats left on the date
pub async fn create_booking_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(payload): JsonBody<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    payload.validate()?;

    let view = state
        .booking_service
        .create(user.id, payload.into_booking(user.id))
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Lists the caller's bookings, newest first.
///
/// # Endpoint
///
/// `GET /api/bookings`
pub async fn list_my_bookings_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ListResponse>, AppError> {
    let (offset, limit) = params.window()?;

    let listing = state
        .booking_service
        .list_mine(user.id, offset, limit)
        .await?;

    Ok(Json(ListResponse::new(listing, &params)))
}

/// Cancels one of the caller's bookings and gives its seats back.
///
/// # Endpoint
///
/// `POST /api/bookings/{id}/cancel`
///
/// Administrators may cancel any booking.
///
/// # Errors
///
/// - 403: booking belongs to another user
/// - 404: booking does not exist
/// - 409: booking is already cancelled or completed
pub async fn cancel_booking_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let view = state
        .booking_service
        .cancel(id, user.id, user.role)
        .await?;
    Ok(Json(view))
}

/// Lists every booking.
///
/// # Endpoint
///
/// `GET /api/admin/bookings?status=pending`
pub async fn admin_list_bookings_handler(
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> Result<Json<ListResponse>, AppError> {
    let (offset, limit) = params.pagination.window()?;

    let listing = state
        .booking_service
        .list_all(params.status, offset, limit)
        .await?;

    Ok(Json(ListResponse::new(listing, &params.pagination)))
}

/// `GET /api/admin/bookings/{id}`
pub async fn admin_get_booking_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.booking_service.get(id).await?))
}

/// Moves a booking through its lifecycle.
///
/// # Endpoint
///
/// `PATCH /api/admin/bookings/{id}/status`
///
/// Allowed transitions: `pending → confirmed | cancelled`,
/// `confirmed → completed | cancelled`. Cancelling gives the seats back.
///
/// # Errors
///
/// - 404: booking does not exist
/// - 409: transition not allowed
pub async fn admin_update_booking_status_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let view = state
        .booking_service
        .update_status(id, payload.status)
        .await?;
    Ok(Json(view))
}

/// `DELETE /api/admin/bookings/{id}`, giving back seats of a live booking.
pub async fn admin_delete_booking_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.booking_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replaces a tour package under the same lock bookings take.
///
/// # Endpoint
///
/// `PUT /api/admin/tour-packages/{id}`
///
/// Each date's `available` is recomputed from the bookings on it, so a stale
/// form cannot hand out seats that are already booked.
///
/// # Errors
///
/// - 400: a field is invalid
/// - 404: tour package does not exist
/// - 409: capacity below booked seats, or a date with live bookings removed
pub async fn admin_update_tour_package_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(tour): JsonBody<TourPackage>,
) -> Result<Json<Value>, AppError> {
    let view = state.booking_service.update_tour(id, tour).await?;
    Ok(Json(view))
}
