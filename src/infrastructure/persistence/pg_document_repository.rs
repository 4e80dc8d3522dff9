//! PostgreSQL implementation of the document repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::document::{SortOrder, StoredDocument};
use crate::domain::repositories::{DocumentPage, DocumentQuery, DocumentRepository};
use crate::error::AppError;

pub(crate) const DOCUMENT_COLUMNS: &str = "id, collection, body, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DocumentRow {
    pub id: i64,
    pub collection: String,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        StoredDocument {
            id: row.id,
            collection: row.collection,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn order_clause(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Newest => "ORDER BY created_at DESC, id DESC",
        SortOrder::Position => "ORDER BY COALESCE((body ->> 'position')::INT, 0) ASC, id ASC",
    }
}

/// PostgreSQL repository storing every collection in the `documents` table.
///
/// Filters use JSONB containment (`body @> $filter`), which the GIN index on
/// `body` serves.
pub struct PgDocumentRepository {
    pool: Arc<PgPool>,
}

impl PgDocumentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, collection: &str, body: Value) -> Result<StoredDocument, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO documents (collection, body) VALUES ($1, $2) RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(collection)
        .bind(body)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: i64,
    ) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = $1 AND id = $2"
        ))
        .bind(collection)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_many(
        &self,
        collection: &str,
        ids: Vec<i64>,
    ) -> Result<Vec<StoredDocument>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE collection = $1 AND id = ANY($2) ORDER BY id"
        ))
        .bind(collection)
        .bind(ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Value,
    ) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE collection = $1 AND body @> $2 ORDER BY id LIMIT 1"
        ))
        .bind(collection)
        .bind(filter)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        collection: &str,
        query: DocumentQuery,
    ) -> Result<DocumentPage, AppError> {
        let filter = query.filter_value();
        let pattern = query.search.as_deref().map(like_pattern);

        const WHERE: &str = "WHERE collection = $1 AND body @> $2 \
             AND ($3::TEXT IS NULL OR body ->> 'name' ILIKE $3 OR body ->> 'title' ILIKE $3)";

        let items_sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents {WHERE} {} LIMIT $4 OFFSET $5",
            order_clause(query.order)
        );
        let count_sql = format!("SELECT COUNT(*) FROM documents {WHERE}");

        let items = sqlx::query_as::<_, DocumentRow>(&items_sql)
            .bind(collection)
            .bind(&filter)
            .bind(&pattern)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(self.pool.as_ref());

        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(collection)
            .bind(&filter)
            .bind(&pattern)
            .fetch_one(self.pool.as_ref());

        let (items, total) = tokio::try_join!(items, total)?;

        Ok(DocumentPage {
            items: items.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn replace(
        &self,
        collection: &str,
        id: i64,
        body: Value,
    ) -> Result<Option<StoredDocument>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "UPDATE documents SET body = $3, updated_at = NOW() \
             WHERE collection = $1 AND id = $2 RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(collection)
        .bind(id)
        .bind(body)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, collection: &str, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("gudeg"), "%gudeg%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_order_clause() {
        assert!(order_clause(SortOrder::Newest).contains("created_at DESC"));
        assert!(order_clause(SortOrder::Position).contains("position"));
    }
}
