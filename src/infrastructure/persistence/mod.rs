//! PostgreSQL repository implementations.
//!
//! Every collection lives in the single `documents` table as JSONB. Queries
//! are built at runtime with SQLx and bound parameters.
//!
//! # Repositories
//!
//! - [`PgDocumentRepository`] - Collection CRUD and listings
//! - [`PgBookingRepository`] - Transactional seat reservation and release

pub mod pg_booking_repository;
pub mod pg_document_repository;

pub use pg_booking_repository::PgBookingRepository;
pub use pg_document_repository::PgDocumentRepository;
