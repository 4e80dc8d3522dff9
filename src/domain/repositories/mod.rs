//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by the stores in the infrastructure layer.
//!
//! # Available Repositories
//!
//! - [`DocumentRepository`] - Collection CRUD, listing and lookups
//! - [`BookingRepository`] - Booking writes that move tour seats atomically
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` for unit tests; HTTP-level
//! tests in `tests/` run against the in-memory store.

pub mod booking_repository;
pub mod document_repository;

pub use booking_repository::BookingRepository;
pub use document_repository::{DocumentPage, DocumentQuery, DocumentRepository};

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
