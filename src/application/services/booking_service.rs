//! Tour booking service.

use serde_json::{Value, json};
use std::sync::Arc;
use validator::Validate;

use crate::application::services::catalog_service::{Listing, Visibility, not_found};
use crate::application::services::population::{populate, populate_many};
use crate::domain::document::{Document, Record, StoredDocument};
use crate::domain::entities::{Booking, BookingStatus, Role, TourPackage};
use crate::domain::repositories::{BookingRepository, DocumentQuery, DocumentRepository};
use crate::error::AppError;

/// Service for reserving seats on tour dates and managing bookings.
///
/// Seat-moving writes go through the [`BookingRepository`], which performs
/// the check and the change atomically. Reads go through the
/// [`DocumentRepository`] and embed the booked tour package and the user.
pub struct BookingService<D, B>
where
    D: DocumentRepository + ?Sized,
    B: BookingRepository + ?Sized,
{
    documents: Arc<D>,
    bookings: Arc<B>,
}

impl<D, B> BookingService<D, B>
where
    D: DocumentRepository + ?Sized,
    B: BookingRepository + ?Sized,
{
    /// Creates a new booking service.
    pub fn new(documents: Arc<D>, bookings: Arc<B>) -> Self {
        Self {
            documents,
            bookings,
        }
    }

    /// Books seats on a tour date for `user_id`.
    ///
    /// The booking starts `pending` and its `total_price` is the tour's price
    /// per person times the number of participants.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the booking is invalid, the tour is
    /// inactive or the date is not offered.
    /// Returns [`AppError::NotFound`] if the tour package does not exist.
    /// Returns [`AppError::Conflict`] if not enough seats are left.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create(&self, user_id: i64, mut booking: Booking) -> Result<Value, AppError> {
        booking.user_id = user_id;
        booking.validate()?;

        let record = self.bookings.create_reserved(booking).await?;

        tracing::info!(
            booking_id = record.id,
            user_id,
            tour_package_id = record.document.tour_package_id,
            participants = record.document.participants,
            "Booking created"
        );

        self.view(record).await
    }

    /// Lists the caller's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_mine(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Listing, AppError> {
        self.list(DocumentQuery::new(offset, limit).with_field("user_id", user_id))
            .await
    }

    /// Cancels a booking on behalf of its owner or an administrator.
    ///
    /// The seats go back to the tour date.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Forbidden`] if the caller neither owns the booking
    /// nor is an administrator.
    /// Returns [`AppError::Conflict`] if the booking is already cancelled or completed.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn cancel(&self, id: i64, user_id: i64, role: Role) -> Result<Value, AppError> {
        let booking = self
            .documents
            .find_by_id(Booking::COLLECTION, id)
            .await?
            .ok_or_else(|| not_found::<Booking>(id))?
            .into_record::<Booking>()?;

        if booking.document.user_id != user_id && role != Role::Admin {
            return Err(AppError::forbidden(
                "Forbidden",
                json!({"reason": "Booking belongs to another user"}),
            ));
        }

        let record = self
            .bookings
            .transition(id, BookingStatus::Cancelled)
            .await?;

        tracing::info!(booking_id = id, user_id, "Booking cancelled");

        self.view(record).await
    }

    /// Lists every booking, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_all(
        &self,
        status: Option<BookingStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Listing, AppError> {
        let mut query = DocumentQuery::new(offset, limit);
        if let Some(status) = status {
            query = query.with_field("status", status.as_str());
        }
        self.list(query).await
    }

    /// Fetches one booking with its tour package and user embedded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let stored = self
            .documents
            .find_by_id(Booking::COLLECTION, id)
            .await?
            .ok_or_else(|| not_found::<Booking>(id))?;

        populate::<Booking, D>(self.documents.as_ref(), stored, Visibility::Admin).await
    }

    /// Moves a booking to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Conflict`] if the transition is not allowed.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update_status(&self, id: i64, status: BookingStatus) -> Result<Value, AppError> {
        let record = self.bookings.transition(id, status).await?;

        tracing::info!(booking_id = id, %status, "Booking status changed");

        self.view(record).await
    }

    /// Deletes a booking, giving back its seats if it still held any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.bookings.delete_releasing(id).await? {
            return Err(not_found::<Booking>(id));
        }

        tracing::info!(booking_id = id, "Booking deleted");
        Ok(())
    }

    /// Replaces a tour package, keeping its seat counts in line with its bookings.
    ///
    /// The `available` count of every date is recomputed from the bookings
    /// on that date; the value in `tour` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is invalid.
    /// Returns [`AppError::NotFound`] if the tour package does not exist.
    /// Returns [`AppError::Conflict`] if a date's capacity drops below its
    /// booked seats, or a date with live bookings is removed.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update_tour(&self, id: i64, tour: TourPackage) -> Result<Value, AppError> {
        tour.validate()?;

        let record = self
            .bookings
            .replace_tour(id, tour)
            .await?
            .ok_or_else(|| not_found::<TourPackage>(id))?;

        tracing::info!(tour_package_id = id, "Tour package updated");

        let stored = record.into_stored()?;
        populate::<TourPackage, D>(self.documents.as_ref(), stored, Visibility::Admin).await
    }

    async fn list(&self, query: DocumentQuery) -> Result<Listing, AppError> {
        let page = self
            .documents
            .list(Booking::COLLECTION, query.with_order(Booking::ORDER))
            .await?;
        let items =
            populate_many::<Booking, D>(self.documents.as_ref(), page.items, Visibility::Admin)
                .await?;

        Ok(Listing {
            items,
            total: page.total,
        })
    }

    async fn view(&self, record: Record<Booking>) -> Result<Value, AppError> {
        let stored: StoredDocument = record.into_stored()?;
        populate::<Booking, D>(self.documents.as_ref(), stored, Visibility::Admin).await
    }
}
