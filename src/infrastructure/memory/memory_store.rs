//! In-process document store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::document::{Document, Record, SortOrder, StoredDocument, matches_filter};
use crate::domain::entities::{Booking, BookingStatus, TourPackage, User};
use crate::domain::repositories::{
    BookingRepository, DocumentPage, DocumentQuery, DocumentRepository,
};
use crate::domain::reservation::{
    check_transition, rebase_seats, releases_seats, reserve_seats, taken_seats,
};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    documents: BTreeMap<i64, StoredDocument>,
}

impl Inner {
    fn get(&self, collection: &str, id: i64) -> Option<&StoredDocument> {
        self.documents
            .get(&id)
            .filter(|doc| doc.collection == collection)
    }

    fn get_mut(&mut self, collection: &str, id: i64) -> Option<&mut StoredDocument> {
        self.documents
            .get_mut(&id)
            .filter(|doc| doc.collection == collection)
    }

    /// Enforces the same unique index the PostgreSQL schema declares on user emails.
    fn check_unique(&self, collection: &str, id: Option<i64>, body: &Value) -> Result<(), AppError> {
        if collection != User::COLLECTION {
            return Ok(());
        }
        let Some(email) = body.get("email") else {
            return Ok(());
        };

        let taken = self.documents.values().any(|doc| {
            doc.collection == collection && Some(doc.id) != id && doc.body.get("email") == Some(email)
        });

        if taken {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "uq_documents_user_email" }),
            ));
        }
        Ok(())
    }

    fn insert(&mut self, collection: &str, body: Value) -> Result<StoredDocument, AppError> {
        self.check_unique(collection, None, &body)?;

        self.next_id += 1;
        let now = Utc::now();
        let doc = StoredDocument {
            id: self.next_id,
            collection: collection.to_string(),
            body,
            created_at: now,
            updated_at: now,
        };
        self.documents.insert(doc.id, doc.clone());
        Ok(doc)
    }

    fn replace(
        &mut self,
        collection: &str,
        id: i64,
        body: Value,
    ) -> Result<Option<StoredDocument>, AppError> {
        if self.get(collection, id).is_none() {
            return Ok(None);
        }
        self.check_unique(collection, Some(id), &body)?;

        let doc = self
            .get_mut(collection, id)
            .map(|doc| {
                doc.body = body;
                doc.updated_at = Utc::now();
                doc.clone()
            });
        Ok(doc)
    }

    fn write<T: Document>(&mut self, id: i64, document: &T) -> Result<StoredDocument, AppError> {
        let body = serde_json::to_value(document)?;
        self.replace(T::COLLECTION, id, body)?.ok_or_else(|| {
            AppError::not_found(format!("{} not found", T::LABEL), json!({ "id": id }))
        })
    }

    fn release_for(&mut self, booking: &Booking) -> Result<(), AppError> {
        let Some(stored) = self
            .get(TourPackage::COLLECTION, booking.tour_package_id)
            .cloned()
        else {
            return Ok(());
        };

        let mut tour = stored.into_record::<TourPackage>()?.document;
        tour.release(booking.tour_date, booking.participants);
        self.write(booking.tour_package_id, &tour)?;
        Ok(())
    }

    fn bookings_for(&self, tour_id: i64) -> Result<Vec<Booking>, AppError> {
        self.documents
            .values()
            .filter(|doc| doc.collection == Booking::COLLECTION)
            .filter(|doc| {
                doc.body.get("tour_package_id").and_then(Value::as_i64) == Some(tour_id)
            })
            .map(|doc| {
                doc.clone()
                    .into_record::<Booking>()
                    .map(|record| record.document)
            })
            .collect()
    }
}

fn position(doc: &StoredDocument) -> i64 {
    doc.body
        .get("position")
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

fn matches_search(doc: &StoredDocument, needle: &str) -> bool {
    ["name", "title"].iter().any(|field| {
        doc.body
            .get(*field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

/// A store that keeps every document in process memory.
///
/// Implements both repository traits behind one lock, which makes seat
/// reservations atomic. Data is lost on restart.
///
/// # Use Cases
///
/// - Local development without PostgreSQL (`STORAGE=memory`)
/// - HTTP-level tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory document store");
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn insert(&self, collection: &str, body: Value) -> Result<StoredDocument, AppError> {
        self.inner.write().await.insert(collection, body)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: i64,
    ) -> Result<Option<StoredDocument>, AppError> {
        Ok(self.inner.read().await.get(collection, id).cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        ids: Vec<i64>,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let inner = self.inner.read().await;
        let mut found: Vec<StoredDocument> = ids
            .into_iter()
            .filter_map(|id| inner.get(collection, id).cloned())
            .collect();
        found.sort_by_key(|doc| doc.id);
        found.dedup_by_key(|doc| doc.id);
        Ok(found)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Value,
    ) -> Result<Option<StoredDocument>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .values()
            .find(|doc| doc.collection == collection && matches_filter(&doc.body, &filter))
            .cloned())
    }

    async fn list(
        &self,
        collection: &str,
        query: DocumentQuery,
    ) -> Result<DocumentPage, AppError> {
        let inner = self.inner.read().await;
        let filter = query.filter_value();
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matched: Vec<&StoredDocument> = inner
            .documents
            .values()
            .filter(|doc| doc.collection == collection)
            .filter(|doc| matches_filter(&doc.body, &filter))
            .filter(|doc| needle.as_deref().is_none_or(|n| matches_search(doc, n)))
            .collect();

        match query.order {
            SortOrder::Newest => matched.sort_by_key(|doc| Reverse((doc.created_at, doc.id))),
            SortOrder::Position => matched.sort_by_key(|doc| (position(doc), doc.id)),
        }

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(DocumentPage { items, total })
    }

    async fn replace(
        &self,
        collection: &str,
        id: i64,
        body: Value,
    ) -> Result<Option<StoredDocument>, AppError> {
        self.inner.write().await.replace(collection, id, body)
    }

    async fn delete(&self, collection: &str, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        if inner.get(collection, id).is_none() {
            return Ok(false);
        }
        Ok(inner.documents.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_reserved(&self, booking: Booking) -> Result<Record<Booking>, AppError> {
        let mut inner = self.inner.write().await;

        let tour_id = booking.tour_package_id;
        let stored = inner
            .get(TourPackage::COLLECTION, tour_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Tour package not found", json!({ "id": tour_id })))?;

        let mut tour = stored.into_record::<TourPackage>()?.document;
        let mut booking = booking;
        reserve_seats(tour_id, &mut tour, &mut booking)?;

        let body = serde_json::to_value(&booking)?;
        inner.write(tour_id, &tour)?;
        inner.insert(Booking::COLLECTION, body)?.into_record()
    }

    async fn transition(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Record<Booking>, AppError> {
        let mut inner = self.inner.write().await;

        let mut booking = inner
            .get(Booking::COLLECTION, id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Booking not found", json!({ "id": id })))?
            .into_record::<Booking>()?
            .document;

        check_transition(id, booking.status, status)?;

        if releases_seats(booking.status, status) {
            inner.release_for(&booking)?;
        }

        booking.status = status;
        inner.write(id, &booking)?.into_record()
    }

    async fn delete_releasing(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;

        let Some(stored) = inner.get(Booking::COLLECTION, id).cloned() else {
            return Ok(false);
        };
        let booking = stored.into_record::<Booking>()?.document;

        if booking.status.holds_seats() {
            inner.release_for(&booking)?;
        }

        inner.documents.remove(&id);
        Ok(true)
    }

    async fn replace_tour(
        &self,
        id: i64,
        tour: TourPackage,
    ) -> Result<Option<Record<TourPackage>>, AppError> {
        let mut inner = self.inner.write().await;

        if inner.get(TourPackage::COLLECTION, id).is_none() {
            return Ok(None);
        }

        let bookings = inner.bookings_for(id)?;
        let mut tour = tour;
        rebase_seats(id, &mut tour, &taken_seats(&bookings))?;

        inner.write(id, &tour)?.into_record().map(Some)
    }
}
