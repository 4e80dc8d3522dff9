//! Curated packages and bookable tour packages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::document::{Document, Reference, default_true};
use crate::domain::entities::{Attraction, Restaurant};

/// A bundle of attractions and restaurants sold at one price.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Package {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub attraction_ids: Vec<i64>,
    #[serde(default)]
    pub restaurant_ids: Vec<i64>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub duration_days: Option<u32>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Package {
    const COLLECTION: &'static str = "packages";
    const LABEL: &'static str = "Package";

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::many(
                "attractions",
                Attraction::COLLECTION,
                self.attraction_ids.clone(),
            ),
            Reference::many(
                "restaurants",
                Restaurant::COLLECTION,
                self.restaurant_ids.clone(),
            ),
        ]
    }
}

/// Seats offered on one departure date of a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDate {
    pub date: NaiveDate,
    pub capacity: u32,
    pub available: u32,
}

/// Why a seat reservation on a tour date was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("tour is not offered on {0}")]
    UnknownDate(NaiveDate),
    #[error("only {available} seats left, {requested} requested")]
    Insufficient { available: u32, requested: u32 },
}

/// A guided tour with scheduled departure dates and limited seats.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_tour_dates"))]
pub struct TourPackage {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price_per_person: f64,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub itinerary: Vec<String>,
    #[serde(default)]
    pub dates: Vec<TourDate>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl TourPackage {
    pub fn date(&self, date: NaiveDate) -> Option<&TourDate> {
        self.dates.iter().find(|d| d.date == date)
    }

    /// Takes `participants` seats from `date`.
    pub fn reserve(&mut self, date: NaiveDate, participants: u32) -> Result<(), SlotError> {
        let slot = self
            .dates
            .iter_mut()
            .find(|d| d.date == date)
            .ok_or(SlotError::UnknownDate(date))?;

        if slot.available < participants {
            return Err(SlotError::Insufficient {
                available: slot.available,
                requested: participants,
            });
        }

        slot.available -= participants;
        Ok(())
    }

    /// Returns `participants` seats to `date`, never above its capacity.
    ///
    /// A date removed from the schedule since the booking was made is ignored.
    pub fn release(&mut self, date: NaiveDate, participants: u32) {
        if let Some(slot) = self.dates.iter_mut().find(|d| d.date == date) {
            slot.available = slot.available.saturating_add(participants).min(slot.capacity);
        }
    }

    pub fn total_price(&self, participants: u32) -> f64 {
        self.price_per_person * f64::from(participants)
    }
}

fn validate_tour_dates(tour: &TourPackage) -> Result<(), ValidationError> {
    for (i, slot) in tour.dates.iter().enumerate() {
        if slot.available > slot.capacity {
            return Err(ValidationError::new("available_exceeds_capacity")
                .with_message("available seats cannot exceed capacity".into()));
        }
        if tour.dates[..i].iter().any(|other| other.date == slot.date) {
            return Err(ValidationError::new("duplicate_date")
                .with_message("tour dates must be unique".into()));
        }
    }
    Ok(())
}

impl Document for TourPackage {
    const COLLECTION: &'static str = "tour_packages";
    const LABEL: &'static str = "Tour package";
}
