//! PostgreSQL implementation of the booking repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::document::{Document, Record, StoredDocument};
use crate::domain::entities::{Booking, BookingStatus, TourPackage};
use crate::domain::repositories::BookingRepository;
use crate::domain::reservation::{
    check_transition, rebase_seats, releases_seats, reserve_seats, taken_seats,
};
use crate::error::AppError;
use crate::infrastructure::persistence::pg_document_repository::{DOCUMENT_COLUMNS, DocumentRow};

/// PostgreSQL repository for seat-moving booking writes.
///
/// Each operation runs in one transaction and takes `FOR UPDATE` row locks,
/// booking first and tour package second, so concurrent reservations on the
/// same tour serialize on the tour's row.
pub struct PgBookingRepository {
    pool: Arc<PgPool>,
}

impl PgBookingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

async fn lock_document(
    tx: &mut Transaction<'_, Postgres>,
    collection: &str,
    id: i64,
) -> Result<Option<StoredDocument>, AppError> {
    let row = sqlx::query_as::<_, DocumentRow>(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE"
    ))
    .bind(collection)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(Into::into))
}

async fn write_body<T: Document>(
    tx: &mut Transaction<'_, Postgres>,
    id: i64,
    document: &T,
) -> Result<StoredDocument, AppError> {
    let row = sqlx::query_as::<_, DocumentRow>(&format!(
        "UPDATE documents SET body = $3, updated_at = NOW() \
         WHERE collection = $1 AND id = $2 RETURNING {DOCUMENT_COLUMNS}"
    ))
    .bind(T::COLLECTION)
    .bind(id)
    .bind(serde_json::to_value(document)?)
    .fetch_one(&mut **tx)
    .await?;

    Ok(row.into())
}

/// Gives a booking's seats back to its tour, if the tour still exists.
async fn release_for(
    tx: &mut Transaction<'_, Postgres>,
    booking: &Booking,
) -> Result<(), AppError> {
    if let Some(stored) =
        lock_document(tx, TourPackage::COLLECTION, booking.tour_package_id).await?
    {
        let tour_id = stored.id;
        let mut tour = stored.into_record::<TourPackage>()?.document;
        tour.release(booking.tour_date, booking.participants);
        write_body(tx, tour_id, &tour).await?;
    }
    Ok(())
}

/// Loads every booking of a tour.
async fn bookings_for(
    tx: &mut Transaction<'_, Postgres>,
    tour_id: i64,
) -> Result<Vec<Booking>, AppError> {
    let rows = sqlx::query_as::<_, DocumentRow>(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = $1 AND body @> $2"
    ))
    .bind(Booking::COLLECTION)
    .bind(json!({ "tour_package_id": tour_id }))
    .fetch_all(&mut **tx)
    .await?;

    rows.into_iter()
        .map(|row| {
            StoredDocument::from(row)
                .into_record::<Booking>()
                .map(|record| record.document)
        })
        .collect()
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_reserved(&self, booking: Booking) -> Result<Record<Booking>, AppError> {
        let mut tx = self.pool.begin().await?;

        let tour_id = booking.tour_package_id;
        let stored = lock_document(&mut tx, TourPackage::COLLECTION, tour_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Tour package not found", json!({ "id": tour_id }))
            })?;

        let mut tour = stored.into_record::<TourPackage>()?.document;
        let mut booking = booking;
        reserve_seats(tour_id, &mut tour, &mut booking)?;

        write_body(&mut tx, tour_id, &tour).await?;

        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO documents (collection, body) VALUES ($1, $2) RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(Booking::COLLECTION)
        .bind(serde_json::to_value(&booking)?)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        StoredDocument::from(row).into_record()
    }

    async fn transition(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Record<Booking>, AppError> {
        let mut tx = self.pool.begin().await?;

        let stored = lock_document(&mut tx, Booking::COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found", json!({ "id": id })))?;
        let mut booking = stored.into_record::<Booking>()?.document;

        check_transition(id, booking.status, status)?;

        if releases_seats(booking.status, status) {
            release_for(&mut tx, &booking).await?;
        }

        booking.status = status;
        let updated = write_body(&mut tx, id, &booking).await?;

        tx.commit().await?;

        updated.into_record()
    }

    async fn delete_releasing(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(stored) = lock_document(&mut tx, Booking::COLLECTION, id).await? else {
            return Ok(false);
        };
        let booking = stored.into_record::<Booking>()?.document;

        if booking.status.holds_seats() {
            release_for(&mut tx, &booking).await?;
        }

        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(Booking::COLLECTION)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn replace_tour(
        &self,
        id: i64,
        tour: TourPackage,
    ) -> Result<Option<Record<TourPackage>>, AppError> {
        let mut tx = self.pool.begin().await?;

        if lock_document(&mut tx, TourPackage::COLLECTION, id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let bookings = bookings_for(&mut tx, id).await?;
        let mut tour = tour;
        rebase_seats(id, &mut tour, &taken_seats(&bookings))?;

        let updated = write_body(&mut tx, id, &tour).await?;

        tx.commit().await?;

        updated.into_record().map(Some)
    }
}
