//! Tour bookings and their status lifecycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::domain::document::{Document, Reference};
use crate::domain::entities::{TourPackage, User};

/// Lifecycle state of a booking.
///
/// ```text
/// pending ──► confirmed ──► completed
///    │            │
///    └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Whether the booking still occupies seats on its tour date.
    pub fn holds_seats(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// A reservation of seats on one date of a tour package.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Booking {
    pub user_id: i64,
    pub tour_package_id: i64,
    pub tour_date: NaiveDate,
    #[validate(range(min = 1, max = 100))]
    pub participants: u32,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    #[validate(length(min = 1, max = 100))]
    pub contact_name: String,
    #[validate(length(min = 5, max = 32))]
    pub contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl Document for Booking {
    const COLLECTION: &'static str = "bookings";
    const LABEL: &'static str = "Booking";

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::one("user", User::COLLECTION, self.user_id),
            Reference::one(
                "tour_package",
                TourPackage::COLLECTION,
                self.tour_package_id,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_forbidden_transitions() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_holds_seats() {
        assert!(Pending.holds_seats());
        assert!(Confirmed.holds_seats());
        assert!(!Cancelled.holds_seats());
        assert!(!Completed.holds_seats());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Confirmed).unwrap(), "confirmed");
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), Cancelled);
        assert!("done".parse::<BookingStatus>().is_err());
    }
}
