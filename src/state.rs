//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, BookingService, CatalogService};
use crate::domain::repositories::{BookingRepository, DocumentRepository};
use crate::utils::jwt::JwtCodec;

pub type DynCatalogService = CatalogService<dyn DocumentRepository>;
pub type DynBookingService = BookingService<dyn DocumentRepository, dyn BookingRepository>;
pub type DynAuthService = AuthService<dyn DocumentRepository>;

/// Attributes of the `auth-token` cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSettings {
    /// Adds the `Secure` attribute; enable when served over HTTPS.
    pub secure: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<DynCatalogService>,
    pub booking_service: Arc<DynBookingService>,
    pub auth_service: Arc<DynAuthService>,
    pub cookie: CookieSettings,
}

impl AppState {
    /// Wires every service onto the given stores.
    pub fn new(
        documents: Arc<dyn DocumentRepository>,
        bookings: Arc<dyn BookingRepository>,
        jwt: JwtCodec,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            catalog_service: Arc::new(CatalogService::new(documents.clone())),
            booking_service: Arc::new(BookingService::new(documents.clone(), bookings)),
            auth_service: Arc::new(AuthService::new(documents, jwt)),
            cookie,
        }
    }
}
