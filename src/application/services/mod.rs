//! Business logic services for the application layer.

pub mod auth_service;
pub mod booking_service;
pub mod catalog_service;
pub mod population;

pub use auth_service::{AuthService, AuthUser, NewAccount, Session};
pub use booking_service::BookingService;
pub use catalog_service::{CatalogService, Listing, Visibility};
