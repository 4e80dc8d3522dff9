//! Seat bookkeeping shared by every [`BookingRepository`] implementation.
//!
//! Stores call these while holding their lock on the tour package, so the
//! checks and the mutation happen as one step.
//!
//! [`BookingRepository`]: crate::domain::repositories::BookingRepository

use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;

use crate::domain::entities::{Booking, BookingStatus, SlotError, TourPackage};
use crate::error::AppError;

impl From<SlotError> for AppError {
    fn from(e: SlotError) -> Self {
        match e {
            SlotError::UnknownDate(date) => AppError::bad_request(
                "Tour is not offered on the requested date",
                json!({ "tour_date": date }),
            ),
            SlotError::Insufficient {
                available,
                requested,
            } => AppError::conflict(
                "Not enough seats available",
                json!({ "available": available, "requested": requested }),
            ),
        }
    }
}

/// Takes the booking's seats from `tour` and prices the booking.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the tour is inactive or the date is unknown.
/// Returns [`AppError::Conflict`] if not enough seats are left.
pub fn reserve_seats(
    tour_id: i64,
    tour: &mut TourPackage,
    booking: &mut Booking,
) -> Result<(), AppError> {
    if !tour.is_active {
        return Err(AppError::bad_request(
            "Tour package is not available for booking",
            json!({ "tour_package_id": tour_id }),
        ));
    }

    tour.reserve(booking.tour_date, booking.participants)?;
    booking.total_price = tour.total_price(booking.participants);
    booking.status = BookingStatus::Pending;
    Ok(())
}

/// Checks that `current → next` is an allowed status change.
///
/// # Errors
///
/// Returns [`AppError::Conflict`] for a disallowed transition.
pub fn check_transition(
    booking_id: i64,
    current: BookingStatus,
    next: BookingStatus,
) -> Result<(), AppError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::conflict(
            "Booking status change not allowed",
            json!({ "id": booking_id, "from": current, "to": next }),
        ))
    }
}

/// Whether moving from `current` to `next` gives seats back to the tour.
///
/// Only cancellation frees seats; a completed tour keeps its date's count.
pub fn releases_seats(current: BookingStatus, next: BookingStatus) -> bool {
    current.holds_seats() && next == BookingStatus::Cancelled
}

/// Seats taken on one tour date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TakenSeats {
    /// Participants of every booking that is not cancelled.
    pub seats: u32,
    /// Whether a pending or confirmed booking is among them.
    pub live: bool,
}

/// Sums the seats taken on each date by `bookings` of one tour.
pub fn taken_seats<'a>(
    bookings: impl IntoIterator<Item = &'a Booking>,
) -> BTreeMap<NaiveDate, TakenSeats> {
    let mut taken: BTreeMap<NaiveDate, TakenSeats> = BTreeMap::new();
    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        let entry = taken.entry(booking.tour_date).or_default();
        entry.seats += booking.participants;
        entry.live |= booking.status.holds_seats();
    }
    taken
}

/// Sets every date's `available` to its capacity minus the seats taken on it.
///
/// # Errors
///
/// Returns [`AppError::Conflict`] if a capacity is below the seats already
/// taken, or a date with live bookings is missing from `tour`.
pub fn rebase_seats(
    tour_id: i64,
    tour: &mut TourPackage,
    taken: &BTreeMap<NaiveDate, TakenSeats>,
) -> Result<(), AppError> {
    for (date, booked) in taken {
        match tour.date(*date) {
            None if booked.live => {
                return Err(AppError::conflict(
                    "Tour date still has live bookings",
                    json!({ "tour_package_id": tour_id, "tour_date": date }),
                ));
            }
            Some(slot) if slot.capacity < booked.seats => {
                return Err(AppError::conflict(
                    "Capacity is below the seats already booked",
                    json!({
                        "tour_package_id": tour_id,
                        "tour_date": date,
                        "capacity": slot.capacity,
                        "booked": booked.seats
                    }),
                ));
            }
            _ => {}
        }
    }

    for slot in &mut tour.dates {
        let booked = taken.get(&slot.date).map_or(0, |t| t.seats);
        slot.available = slot.capacity - booked;
    }
    Ok(())
}
