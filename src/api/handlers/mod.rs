//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod health;

pub use auth::{
    list_users_handler, login_handler, logout_handler, me_handler, register_handler,
    update_user_role_handler,
};
pub use bookings::{
    admin_delete_booking_handler, admin_get_booking_handler, admin_list_bookings_handler,
    admin_update_booking_status_handler, admin_update_tour_package_handler,
    cancel_booking_handler, create_booking_handler, list_my_bookings_handler,
};
pub use catalog::{
    create_handler, delete_handler, get_admin_handler, get_public_handler, list_admin_handler,
    list_public_handler, restaurant_menus_handler, update_handler,
};
pub use health::health_handler;
