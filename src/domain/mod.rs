//! Domain layer containing business entities and logic.
//!
//! Defines the document model, entities, repository interfaces and the seat
//! bookkeeping rules, independent of storage and HTTP concerns.
//!
//! # Architecture
//!
//! - [`document`] - Document trait, stored records and population references
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`reservation`] - Seat reservation rules shared by booking stores
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod document;
pub mod entities;
pub mod repositories;
pub mod reservation;
