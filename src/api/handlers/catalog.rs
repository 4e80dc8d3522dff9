//! Generic handlers for catalog collections.
//!
//! Each handler is instantiated once per document type in the routers, e.g.
//! `get(list_public_handler::<Attraction>)`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;

use crate::api::dto::catalog::CatalogQueryParams;
use crate::api::dto::pagination::ListResponse;
use crate::api::extract::JsonBody;
use crate::application::services::Visibility;
use crate::domain::document::Document;
use crate::domain::entities::{Menu, Restaurant};
use crate::error::AppError;
use crate::state::AppState;

/// Lists active documents of a collection.
///
/// # Endpoint
///
/// `GET /api/{collection}`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 20, max: 100)
/// - `search` (optional): Substring of `name` or `title`
/// - `category`, `restaurant_id`, `attraction_id` (optional): Equality
///   filters, on collections that have the field
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_public_handler<T: Document>(
    State(state): State<AppState>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<Json<ListResponse>, AppError> {
    let query = params.to_query::<T>()?;
    let listing = state
        .catalog_service
        .list::<T>(query, Visibility::Public)
        .await?;

    Ok(Json(ListResponse::new(listing, &params.pagination)))
}

/// Fetches one active document with its references embedded.
///
/// # Endpoint
///
/// `GET /api/{collection}/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the document does not exist or is inactive.
pub async fn get_public_handler<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let view = state
        .catalog_service
        .get::<T>(id, Visibility::Public)
        .await?;
    Ok(Json(view))
}

/// Lists the active menu items of an active restaurant.
///
/// # Endpoint
///
/// `GET /api/restaurants/{id}/menus`
///
/// # Errors
///
/// Returns 404 Not Found if the restaurant does not exist or is inactive.
pub async fn restaurant_menus_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<Json<ListResponse>, AppError> {
    state
        .catalog_service
        .get::<Restaurant>(id, Visibility::Public)
        .await?;

    let query = params.to_query::<Menu>()?.with_field("restaurant_id", id);
    let listing = state
        .catalog_service
        .list::<Menu>(query, Visibility::Public)
        .await?;

    Ok(Json(ListResponse::new(listing, &params.pagination)))
}

/// Lists every document of a collection, active or not.
///
/// # Endpoint
///
/// `GET /api/admin/{collection}`
///
/// Accepts the public listing parameters plus `active_only`.
pub async fn list_admin_handler<T: Document>(
    State(state): State<AppState>,
    Query(params): Query<CatalogQueryParams>,
) -> Result<Json<ListResponse>, AppError> {
    let query = params.to_query::<T>()?;
    let listing = state
        .catalog_service
        .list::<T>(query, Visibility::Admin)
        .await?;

    Ok(Json(ListResponse::new(listing, &params.pagination)))
}

/// `GET /api/admin/{collection}/{id}`
pub async fn get_admin_handler<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let view = state.catalog_service.get::<T>(id, Visibility::Admin).await?;
    Ok(Json(view))
}

/// Creates a document.
///
/// # Endpoint
///
/// `POST /api/admin/{collection}`
///
/// # Errors
///
/// Returns 400 if a field is invalid or a referenced document does not exist.
pub async fn create_handler<T: Document>(
    State(state): State<AppState>,
    JsonBody(document): JsonBody<T>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let view = state.catalog_service.create(document).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Replaces a document.
///
/// # Endpoint
///
/// `PUT /api/admin/{collection}/{id}`
///
/// # Errors
///
/// Returns 400 if a field is invalid or a referenced document does not exist.
/// Returns 404 if the document does not exist.
pub async fn update_handler<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(document): JsonBody<T>,
) -> Result<Json<Value>, AppError> {
    let view = state.catalog_service.update(id, document).await?;
    Ok(Json(view))
}

/// `DELETE /api/admin/{collection}/{id}`, answering 204 No Content.
pub async fn delete_handler<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.catalog_service.delete::<T>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
