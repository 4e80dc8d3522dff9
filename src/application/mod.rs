//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin
//! CLI one place for validation, referential checks and population.
//!
//! # Available Services
//!
//! - [`services::catalog_service::CatalogService`] - Catalog CRUD and public browsing
//! - [`services::booking_service::BookingService`] - Seat reservations and booking lifecycle
//! - [`services::auth_service::AuthService`] - Accounts, JWT issuance and authentication

pub mod services;
