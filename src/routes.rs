//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check (public)
//! - `/api/*`            - Catalog browsing and credentials (public)
//! - `/api/*`            - Account and bookings (JWT required)
//! - `/api/admin/*`      - Catalog, booking and user management (admin role required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on credential and admin routes
//! - **Authentication** - JWT from the `Authorization` header or `auth-token` cookie
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::PeerIpGovernorLayer;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

fn limited(router: Router<AppState>, limit: Option<PeerIpGovernorLayer>) -> Router<AppState> {
    match limit {
        Some(limit) => router.layer(limit),
        None => router,
    }
}

/// Constructs the router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limited` - when `true`, per-IP limits apply; the router must then
///   be served with connect info so the peer address is known
pub fn router(state: AppState, rate_limited: bool) -> Router {
    let public = limited(
        api::routes::public_routes(),
        rate_limited.then(rate_limit::layer),
    );

    let credentials = limited(
        api::routes::credential_routes(),
        rate_limited.then(rate_limit::secure_layer),
    );

    let user = limited(
        api::routes::user_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        rate_limited.then(rate_limit::layer),
    );

    let admin = limited(
        api::routes::admin_routes()
            .route_layer(middleware::from_fn(auth::require_admin))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
        rate_limited.then(rate_limit::secure_layer),
    );

    let api_router = Router::new()
        .merge(public)
        .merge(credentials)
        .merge(user)
        .nest("/admin", admin);

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// [`router`] wrapped so `/api/attractions/` and `/api/attractions` match alike.
pub fn app_router(state: AppState, rate_limited: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, rate_limited))
}
