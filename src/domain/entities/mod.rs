//! Core domain entities representing the portal's data model.
//!
//! Every entity implements [`crate::domain::document::Document`] and is
//! persisted as a JSON document in its own collection.
//!
//! # Entity Types
//!
//! - [`User`] - Registered account with a [`Role`]
//! - [`Attraction`], [`Restaurant`], [`Menu`] - Places and what they serve
//! - [`Package`], [`TourPackage`] - Curated bundles and bookable tours
//! - [`Booking`] - Seats reserved on a tour date
//! - [`Story`], [`Banner`], [`Highlight`], [`News`], [`Research`] - Editorial content
//! - [`Souvenir`] - Local products
//!
//! Field-level rules (required, ranges, formats) are declared with
//! `validator` derives and checked before every write.

pub mod attraction;
pub mod booking;
pub mod content;
pub mod menu;
pub mod package;
pub mod souvenir;
pub mod user;

pub use attraction::{Attraction, Restaurant};
pub use booking::{Booking, BookingStatus};
pub use content::{Banner, Highlight, News, Research, Story};
pub use menu::Menu;
pub use package::{Package, SlotError, TourDate, TourPackage};
pub use souvenir::Souvenir;
pub use user::{Role, User, normalize_email};
