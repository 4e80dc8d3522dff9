//! DTOs for booking endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::auth::PHONE_REGEX;
use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::{Booking, BookingStatus};

/// Request to book seats on a tour date.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub tour_package_id: i64,

    /// Departure date, `YYYY-MM-DD`.
    pub tour_date: NaiveDate,

    #[validate(range(min = 1, max = 100))]
    pub participants: u32,

    #[validate(length(min = 1, max = 100))]
    pub contact_name: String,

    #[validate(regex(path = "*PHONE_REGEX", message = "Invalid phone number"))]
    pub contact_phone: String,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    /// Builds the booking for `user_id`; price and status are set on reservation.
    pub fn into_booking(self, user_id: i64) -> Booking {
        Booking {
            user_id,
            tour_package_id: self.tour_package_id,
            tour_date: self.tour_date,
            participants: self.participants,
            total_price: 0.0,
            status: BookingStatus::Pending,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            notes: self.notes,
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}
