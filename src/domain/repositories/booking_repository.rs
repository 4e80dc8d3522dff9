//! Repository trait for bookings that move seats on tour dates.

use crate::domain::document::Record;
use crate::domain::entities::{Booking, BookingStatus, TourPackage};
use crate::error::AppError;
use async_trait::async_trait;

/// Booking writes that must change a tour package's seats atomically.
///
/// Plain reads go through [`crate::domain::repositories::DocumentRepository`];
/// every write here locks the tour package for the duration of the change so
/// concurrent bookings cannot oversell a date.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBookingRepository`] - row locks in one transaction
/// - [`crate::infrastructure::memory::MemoryStore`] - single write lock
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Takes seats from the tour date and stores the booking.
    ///
    /// `total_price` is computed from the tour's current price per person.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the tour package does not exist.
    /// Returns [`AppError::Validation`] if the tour is inactive or the date is not offered.
    /// Returns [`AppError::Conflict`] if not enough seats are left.
    async fn create_reserved(&self, booking: Booking) -> Result<Record<Booking>, AppError>;

    /// Moves a booking to `status`, releasing its seats on cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Conflict`] if the transition is not allowed.
    async fn transition(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Record<Booking>, AppError>;

    /// Deletes a booking, releasing its seats if it still held any.
    ///
    /// Returns `false` when the booking did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_releasing(&self, id: i64) -> Result<bool, AppError>;

    /// Replaces a tour package, recomputing each date's free seats from the
    /// bookings on it.
    ///
    /// Returns `None` when the tour package did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a date's capacity is below its booked
    /// seats, or a date that live bookings hold seats on is missing from `tour`.
    async fn replace_tour(
        &self,
        id: i64,
        tour: TourPackage,
    ) -> Result<Option<Record<TourPackage>>, AppError>;
}
