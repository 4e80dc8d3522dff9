//! Query parameters for catalog listings.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::api::dto::pagination::PaginationParams;
use crate::domain::document::Document;
use crate::domain::repositories::DocumentQuery;
use crate::error::AppError;

/// Listing parameters shared by every catalog collection.
///
/// Reference filters are only applied to collections that declare them in
/// [`Document::FILTER_FIELDS`]; elsewhere they are ignored.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Case-insensitive substring of `name` or `title`.
    #[serde(default)]
    pub search: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub restaurant_id: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub attraction_id: Option<i64>,

    /// Admin-only activity filter; public listings are always active-only.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub active_only: Option<bool>,
}

impl CatalogQueryParams {
    /// Builds the storage query for collection `T`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if pagination is out of range.
    pub fn to_query<T: Document>(&self) -> Result<DocumentQuery, AppError> {
        let (offset, limit) = self.pagination.window()?;
        let mut query = DocumentQuery::new(offset, limit).with_search(self.search.clone());

        if let Some(category) = &self.category
            && T::FILTER_FIELDS.contains(&"category")
        {
            query = query.with_field("category", category.as_str());
        }
        if let Some(id) = self.restaurant_id
            && T::FILTER_FIELDS.contains(&"restaurant_id")
        {
            query = query.with_field("restaurant_id", id);
        }
        if let Some(id) = self.attraction_id
            && T::FILTER_FIELDS.contains(&"attraction_id")
        {
            query = query.with_field("attraction_id", id);
        }
        if self.active_only == Some(true) {
            query = query.with_field("is_active", true);
        }

        Ok(query)
    }
}
