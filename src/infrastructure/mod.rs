//! Infrastructure layer for storage backends.
//!
//! Implements the repository traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repositories
//! - [`memory`] - In-process store for development and tests

pub mod memory;
pub mod persistence;
