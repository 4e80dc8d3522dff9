//! Catalog management service shared by every browsable collection.

use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::application::services::population::{populate, populate_many};
use crate::domain::document::Document;
use crate::domain::repositories::{DocumentQuery, DocumentRepository};
use crate::error::AppError;

/// Who is looking at the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visitors only see documents with `is_active == true`.
    Public,
    /// Administrators see everything.
    Admin,
}

/// One page of populated documents with the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub items: Vec<Value>,
    pub total: i64,
}

/// Service for creating, browsing and maintaining catalog documents.
///
/// Every operation is generic over the [`Document`] type, which supplies the
/// collection name, listing order, filterable fields and references.
/// Writes validate the document and check that every referenced document
/// exists; reads embed referenced documents.
pub struct CatalogService<R: DocumentRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: DocumentRepository + ?Sized> CatalogService<R> {
    /// Creates a new catalog service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates and stores a new document, returning its populated view.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is invalid or a referenced
    /// document does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create<T: Document>(&self, document: T) -> Result<Value, AppError> {
        document.validate()?;
        self.check_references(&document).await?;

        let stored = self
            .repository
            .insert(T::COLLECTION, serde_json::to_value(&document)?)
            .await?;

        tracing::info!(collection = T::COLLECTION, id = stored.id, "Document created");

        populate::<T, R>(self.repository.as_ref(), stored, Visibility::Admin).await
    }

    /// Fetches one document with its references embedded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the document does not exist, or is
    /// inactive and `visibility` is [`Visibility::Public`].
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get<T: Document>(&self, id: i64, visibility: Visibility) -> Result<Value, AppError> {
        let stored = self
            .repository
            .find_by_id(T::COLLECTION, id)
            .await?
            .filter(|stored| visibility == Visibility::Admin || is_active(&stored.body))
            .ok_or_else(|| not_found::<T>(id))?;

        populate::<T, R>(self.repository.as_ref(), stored, visibility).await
    }

    /// Lists a page of documents in the collection's order.
    ///
    /// Public listings only include active documents.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list<T: Document>(
        &self,
        query: DocumentQuery,
        visibility: Visibility,
    ) -> Result<Listing, AppError> {
        let mut query = query.with_order(T::ORDER);
        if visibility == Visibility::Public {
            query = query.with_field("is_active", true);
        }

        let page = self.repository.list(T::COLLECTION, query).await?;
        let items =
            populate_many::<T, R>(self.repository.as_ref(), page.items, visibility).await?;

        Ok(Listing {
            items,
            total: page.total,
        })
    }

    /// Replaces a document wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is invalid or a referenced
    /// document does not exist.
    /// Returns [`AppError::NotFound`] if the document does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update<T: Document>(&self, id: i64, document: T) -> Result<Value, AppError> {
        document.validate()?;
        self.check_references(&document).await?;

        let stored = self
            .repository
            .replace(T::COLLECTION, id, serde_json::to_value(&document)?)
            .await?
            .ok_or_else(|| not_found::<T>(id))?;

        tracing::info!(collection = T::COLLECTION, id, "Document updated");

        populate::<T, R>(self.repository.as_ref(), stored, Visibility::Admin).await
    }

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the document does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete<T: Document>(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(T::COLLECTION, id).await? {
            return Err(not_found::<T>(id));
        }

        tracing::info!(collection = T::COLLECTION, id, "Document deleted");
        Ok(())
    }

    /// Checks that the backing store answers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn check_references<T: Document>(&self, document: &T) -> Result<(), AppError> {
        for reference in document.references() {
            let wanted: BTreeSet<i64> = reference.ids().into_iter().collect();
            if wanted.is_empty() {
                continue;
            }

            let found: BTreeSet<i64> = self
                .repository
                .find_many(reference.collection, wanted.iter().copied().collect())
                .await?
                .into_iter()
                .map(|stored| stored.id)
                .collect();

            let missing: Vec<i64> = wanted.difference(&found).copied().collect();
            if !missing.is_empty() {
                return Err(AppError::bad_request(
                    "Referenced document not found",
                    json!({"field": reference.field, "missing": missing}),
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn is_active(body: &Value) -> bool {
    body.get("is_active").and_then(Value::as_bool) == Some(true)
}

pub(crate) fn not_found<T: Document>(id: i64) -> AppError {
    AppError::not_found(format!("{} not found", T::LABEL), json!({"id": id}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{SortOrder, StoredDocument};
    use crate::domain::entities::{Attraction, Banner, Highlight, Menu};
    use crate::domain::repositories::{DocumentPage, MockDocumentRepository};
    use chrono::Utc;

    fn stored(collection: &str, id: i64, body: Value) -> StoredDocument {
        StoredDocument {
            id,
            collection: collection.to_string(),
            body,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn attraction() -> Attraction {
        serde_json::from_value(json!({
            "name": "Goa Pindul",
            "description": "Cave tubing on the Oya river"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_success() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_insert()
            .withf(|collection, body| collection == "attractions" && body["name"] == "Goa Pindul")
            .times(1)
            .returning(|collection, body| Ok(stored(collection, 1, body)));

        let service = CatalogService::new(Arc::new(repo));

        let view = service.create(attraction()).await.unwrap();

        assert_eq!(view["id"], 1);
        assert_eq!(view["is_active"], true);
    }

    #[tokio::test]
    async fn test_create_invalid_document() {
        let repo = MockDocumentRepository::new();
        let service = CatalogService::new(Arc::new(repo));

        let mut invalid = attraction();
        invalid.name = String::new();

        let result = service.create(invalid).await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_with_missing_reference() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_many()
            .withf(|collection, ids| collection == "restaurants" && ids == &vec![42])
            .times(1)
            .returning(|_, _| Ok(vec![]));
        repo.expect_insert().never();

        let service = CatalogService::new(Arc::new(repo));
        let menu: Menu = serde_json::from_value(json!({
            "restaurant_id": 42,
            "name": "Gudeg",
            "price": 15000.0
        }))
        .unwrap();

        let err = service.create(menu).await.unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_error_info().details["missing"], json!([42]));
    }

    #[tokio::test]
    async fn test_get_public_hides_inactive() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_id().returning(|collection, id| {
            Ok(Some(stored(
                collection,
                id,
                json!({"name": "Closed", "description": "d", "is_active": false}),
            )))
        });

        let service = CatalogService::new(Arc::new(repo));

        let public = service.get::<Attraction>(3, Visibility::Public).await;
        assert!(matches!(public.unwrap_err(), AppError::NotFound { .. }));

        let admin = service.get::<Attraction>(3, Visibility::Admin).await.unwrap();
        assert_eq!(admin["name"], "Closed");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_by_id().returning(|_, _| Ok(None));

        let service = CatalogService::new(Arc::new(repo));

        let err = service.get::<Attraction>(9, Visibility::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_error_info().message, "Attraction not found");
    }

    #[tokio::test]
    async fn test_list_public_filters_active_and_orders() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_list()
            .withf(|collection, query| {
                collection == "banners"
                    && query.order == SortOrder::Position
                    && query.filter.get("is_active") == Some(&json!(true))
            })
            .times(1)
            .returning(|_, _| {
                Ok(DocumentPage {
                    items: vec![stored(
                        "banners",
                        1,
                        json!({"title": "Welcome", "image": "https://cdn.example.com/b.jpg"}),
                    )],
                    total: 1,
                })
            });

        let service = CatalogService::new(Arc::new(repo));

        let listing = service
            .list::<Banner>(DocumentQuery::new(0, 20), Visibility::Public)
            .await
            .unwrap();

        assert_eq!(listing.total, 1);
        assert_eq!(listing.items[0]["title"], "Welcome");
    }

    #[tokio::test]
    async fn test_list_admin_sees_everything() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_list()
            .withf(|_, query| query.filter.is_empty() && query.order == SortOrder::Newest)
            .times(1)
            .returning(|_, _| {
                Ok(DocumentPage {
                    items: vec![],
                    total: 0,
                })
            });

        let service = CatalogService::new(Arc::new(repo));

        let listing = service
            .list::<Attraction>(DocumentQuery::new(0, 20), Visibility::Admin)
            .await
            .unwrap();

        assert!(listing.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_replace().returning(|_, _, _| Ok(None));

        let service = CatalogService::new(Arc::new(repo));

        let err = service.update(5, attraction()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_checks_optional_reference() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_find_many()
            .returning(|collection, ids| Ok(vec![stored(collection, ids[0], json!({"name": "A"}))]));
        repo.expect_replace()
            .times(1)
            .returning(|collection, id, body| Ok(Some(stored(collection, id, body))));

        let service = CatalogService::new(Arc::new(repo));
        let highlight: Highlight = serde_json::from_value(json!({
            "title": "Sunrise",
            "image": "https://cdn.example.com/s.jpg",
            "attraction_id": 7
        }))
        .unwrap();

        let view = service.update(2, highlight).await.unwrap();

        assert_eq!(view["attraction"]["id"], 7);
    }

    #[tokio::test]
    async fn test_delete() {
        let mut repo = MockDocumentRepository::new();
        repo.expect_delete()
            .withf(|collection, id| collection == "attractions" && *id == 1)
            .returning(|_, _| Ok(true));
        repo.expect_delete()
            .withf(|_, id| *id == 2)
            .returning(|_, _| Ok(false));

        let service = CatalogService::new(Arc::new(repo));

        assert!(service.delete::<Attraction>(1).await.is_ok());
        assert!(matches!(
            service.delete::<Attraction>(2).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
