//! API route configuration.
//!
//! Routes are grouped by the protection they need; [`crate::routes`] applies
//! authentication and rate limiting to each group.

use crate::api::handlers::{
    admin_delete_booking_handler, admin_get_booking_handler, admin_list_bookings_handler,
    admin_update_booking_status_handler, admin_update_tour_package_handler,
    cancel_booking_handler, create_booking_handler, create_handler, delete_handler,
    get_admin_handler, get_public_handler, list_admin_handler, list_my_bookings_handler,
    list_public_handler, list_users_handler, login_handler, logout_handler, me_handler,
    register_handler, restaurant_menus_handler, update_handler, update_user_role_handler,
};
use crate::domain::document::Document;
use crate::domain::entities::{
    Attraction, Banner, Highlight, Menu, News, Package, Research, Restaurant, Souvenir, Story,
    TourPackage,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Read-only browsing routes for one collection.
fn public_collection<T: Document>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(&format!("/{path}"), get(list_public_handler::<T>))
        .route(&format!("/{path}/{{id}}"), get(get_public_handler::<T>))
}

/// Full CRUD routes for one collection.
fn admin_collection<T: Document>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(
            &format!("/{path}"),
            get(list_admin_handler::<T>).post(create_handler::<T>),
        )
        .route(
            &format!("/{path}/{{id}}"),
            get(get_admin_handler::<T>)
                .put(update_handler::<T>)
                .delete(delete_handler::<T>),
        )
}

/// Admin routes for tour packages.
///
/// Replacing a tour goes through the booking service so seat counts stay
/// tied to the bookings on each date.
fn admin_tour_packages(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/tour-packages",
            get(list_admin_handler::<TourPackage>).post(create_handler::<TourPackage>),
        )
        .route(
            "/tour-packages/{id}",
            get(get_admin_handler::<TourPackage>)
                .put(admin_update_tour_package_handler)
                .delete(delete_handler::<TourPackage>),
        )
}

/// Applies `register` to every other catalog collection under its URL segment.
///
/// Tour packages are registered separately by each route group.
macro_rules! catalog_collections {
    ($router:expr, $register:ident) => {{
        let router = $router;
        let router = $register::<Attraction>(router, "attractions");
        let router = $register::<Restaurant>(router, "restaurants");
        let router = $register::<Menu>(router, "menus");
        let router = $register::<Package>(router, "packages");
        let router = $register::<Story>(router, "stories");
        let router = $register::<Banner>(router, "banners");
        let router = $register::<Highlight>(router, "highlights");
        let router = $register::<News>(router, "news");
        let router = $register::<Research>(router, "research");
        $register::<Souvenir>(router, "souvenirs")
    }};
}

/// Public browsing routes.
///
/// # Endpoints
///
/// - `GET /{collection}`              - Active documents, paginated
/// - `GET /{collection}/{id}`         - One active document, populated
/// - `GET /restaurants/{id}/menus`    - Active menu items of a restaurant
///
/// Collections: `attractions`, `restaurants`, `menus`, `packages`,
/// `tour-packages`, `stories`, `banners`, `highlights`, `news`, `research`,
/// `souvenirs`.
pub fn public_routes() -> Router<AppState> {
    let router = catalog_collections!(Router::new(), public_collection);
    public_collection::<TourPackage>(router, "tour-packages")
        .route("/restaurants/{id}/menus", get(restaurant_menus_handler))
}

/// Credential routes, open to anyone.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - Obtain a token and the `auth-token` cookie
/// - `POST /auth/logout`   - Clear the cookie
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
}

/// Routes for any signed-in user.
///
/// # Endpoints
///
/// - `GET  /auth/me`               - The caller's account
/// - `POST /bookings`              - Book a tour date
/// - `GET  /bookings`              - The caller's bookings
/// - `POST /bookings/{id}/cancel`  - Cancel one of the caller's bookings
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me_handler))
        .route(
            "/bookings",
            get(list_my_bookings_handler).post(create_booking_handler),
        )
        .route("/bookings/{id}/cancel", post(cancel_booking_handler))
}

/// Administrator routes, nested under `/admin`.
///
/// # Endpoints
///
/// - `GET|POST /{collection}`                   - List all / create
/// - `GET|PUT|DELETE /{collection}/{id}`        - Read / replace / delete
/// - `PUT /tour-packages/{id}`                  - Replace, recomputing free seats
/// - `GET /bookings`                            - All bookings, `?status=` filter
/// - `GET|DELETE /bookings/{id}`                - Read / delete a booking
/// - `PATCH /bookings/{id}/status`              - Move a booking through its lifecycle
/// - `GET /users`                               - List users
/// - `PATCH /users/{id}/role`                   - Change a user's role
pub fn admin_routes() -> Router<AppState> {
    admin_tour_packages(catalog_collections!(Router::new(), admin_collection))
        .route("/bookings", get(admin_list_bookings_handler))
        .route(
            "/bookings/{id}",
            get(admin_get_booking_handler).delete(admin_delete_booking_handler),
        )
        .route(
            "/bookings/{id}/status",
            patch(admin_update_booking_status_handler),
        )
        .route("/users", get(list_users_handler))
        .route("/users/{id}/role", patch(update_user_role_handler))
}
