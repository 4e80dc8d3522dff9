//! Repository trait for collection-level document storage.

use crate::domain::document::{SortOrder, StoredDocument};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Parameters for a paginated collection listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    pub offset: i64,
    pub limit: i64,
    /// Top-level equality filter applied to document bodies.
    pub filter: Map<String, Value>,
    /// Case-insensitive substring matched against `name` or `title`.
    pub search: Option<String>,
    pub order: SortOrder,
}

impl DocumentQuery {
    /// Creates a query for the given page window with no filters.
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            filter: Map::new(),
            search: None,
            order: SortOrder::Newest,
        }
    }

    /// Adds an equality condition on a body field.
    pub fn with_field(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.insert(field.to_string(), value.into());
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn filter_value(&self) -> Value {
        Value::Object(self.filter.clone())
    }
}

/// One page of a listing together with the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPage {
    pub items: Vec<StoredDocument>,
    pub total: i64,
}

/// Repository interface for document collections.
///
/// Bodies are JSON objects; the store assigns ids and timestamps.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDocumentRepository`] - PostgreSQL JSONB
/// - [`crate::infrastructure::memory::MemoryStore`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Stores a new document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a unique index rejects the body.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, collection: &str, body: Value) -> Result<StoredDocument, AppError>;

    /// Finds a document by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_id(&self, collection: &str, id: i64)
    -> Result<Option<StoredDocument>, AppError>;

    /// Finds every document whose id is in `ids`. Missing ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_many(
        &self,
        collection: &str,
        ids: Vec<i64>,
    ) -> Result<Vec<StoredDocument>, AppError>;

    /// Finds the first document matching an equality filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_one(
        &self,
        collection: &str,
        filter: Value,
    ) -> Result<Option<StoredDocument>, AppError>;

    /// Lists a page of documents.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list(&self, collection: &str, query: DocumentQuery)
    -> Result<DocumentPage, AppError>;

    /// Replaces the body of an existing document, bumping `updated_at`.
    ///
    /// Returns `None` when the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a unique index rejects the body.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn replace(
        &self,
        collection: &str,
        id: i64,
        body: Value,
    ) -> Result<Option<StoredDocument>, AppError>;

    /// Deletes a document. Returns `false` when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete(&self, collection: &str, id: i64) -> Result<bool, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder() {
        let query = DocumentQuery::new(20, 10)
            .with_field("restaurant_id", 4)
            .with_field("is_active", true)
            .with_search(Some("  gudeg ".to_string()))
            .with_order(SortOrder::Position);

        assert_eq!(query.offset, 20);
        assert_eq!(query.limit, 10);
        assert_eq!(
            query.filter_value(),
            json!({"restaurant_id": 4, "is_active": true})
        );
        assert_eq!(query.search.as_deref(), Some("gudeg"));
        assert_eq!(query.order, SortOrder::Position);
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let query = DocumentQuery::new(0, 10).with_search(Some("   ".to_string()));

        assert!(query.search.is_none());
    }
}
