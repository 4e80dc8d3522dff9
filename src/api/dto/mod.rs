//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Catalog documents are accepted as their entity types
//! directly.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod health;
pub mod pagination;
