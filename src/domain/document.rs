//! Document model shared by every persisted entity.
//!
//! Entities are stored as JSON bodies inside named collections. The store
//! assigns the id and timestamps; everything else lives in the body.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use validator::Validate;

use crate::error::AppError;

/// Body field holding a user's password hash. Stripped from every public view.
pub const PASSWORD_HASH_FIELD: &str = "password_hash";

/// Ordering applied to collection listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Most recently created first.
    Newest,
    /// Ascending by the body's `position` field, ties broken by id.
    Position,
}

/// A typed entity persisted as a document.
pub trait Document: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    /// Collection the documents live in.
    const COLLECTION: &'static str;

    /// Human-readable singular name used in error messages.
    const LABEL: &'static str;

    /// Listing order for the collection.
    const ORDER: SortOrder = SortOrder::Newest;

    /// Body fields listings may filter on by equality.
    const FILTER_FIELDS: &'static [&'static str] = &[];

    /// References to other documents, resolved by population on read.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A reference from one document to others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Key the populated value is written under.
    pub field: &'static str,
    /// Collection of the referenced documents.
    pub collection: &'static str,
    pub target: ReferenceTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceTarget {
    One(i64),
    Many(Vec<i64>),
}

impl Reference {
    pub fn one(field: &'static str, collection: &'static str, id: i64) -> Self {
        Self {
            field,
            collection,
            target: ReferenceTarget::One(id),
        }
    }

    pub fn many(field: &'static str, collection: &'static str, ids: Vec<i64>) -> Self {
        Self {
            field,
            collection,
            target: ReferenceTarget::Many(ids),
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        match &self.target {
            ReferenceTarget::One(id) => vec![*id],
            ReferenceTarget::Many(ids) => ids.clone(),
        }
    }
}

/// Untyped document as held by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: i64,
    pub collection: String,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredDocument {
    /// Decodes the body into its entity type.
    pub fn into_record<T: Document>(self) -> Result<Record<T>, AppError> {
        Ok(Record {
            id: self.id,
            document: serde_json::from_value(self.body)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Flattened JSON view (`id`, body fields, timestamps) with secrets removed.
    pub fn to_public_json(&self) -> Value {
        let mut object = match &self.body {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        object.remove(PASSWORD_HASH_FIELD);
        object.insert("id".to_string(), Value::from(self.id));
        object.insert("created_at".to_string(), json!(self.created_at));
        object.insert("updated_at".to_string(), json!(self.updated_at));
        Value::Object(object)
    }
}

/// A typed document together with its store metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Record<T> {
    pub id: i64,
    #[serde(flatten)]
    pub document: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: Document> Record<T> {
    /// Encodes the record back into its stored form.
    pub fn into_stored(self) -> Result<StoredDocument, AppError> {
        Ok(StoredDocument {
            id: self.id,
            collection: T::COLLECTION.to_string(),
            body: serde_json::to_value(&self.document)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Returns whether `body` matches every top-level key of `filter`.
///
/// Mirrors the JSONB `@>` containment used by the PostgreSQL store for
/// scalar filter values.
pub fn matches_filter(body: &Value, filter: &Value) -> bool {
    match filter {
        Value::Object(wanted) => wanted
            .iter()
            .all(|(key, value)| body.get(key) == Some(value)),
        Value::Null => true,
        _ => false,
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored(body: Value) -> StoredDocument {
        StoredDocument {
            id: 9,
            collection: "users".to_string(),
            body,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_json_strips_password_hash() {
        let doc = stored(json!({"email": "a@b.io", "password_hash": "secret"}));

        let view = doc.to_public_json();

        assert_eq!(view["id"], 9);
        assert_eq!(view["email"], "a@b.io");
        assert!(view.get("password_hash").is_none());
        assert!(view.get("created_at").is_some());
    }

    #[test]
    fn test_matches_filter_scalar_equality() {
        let body = json!({"restaurant_id": 3, "is_active": true, "name": "Soto"});

        assert!(matches_filter(&body, &json!({})));
        assert!(matches_filter(&body, &json!({"restaurant_id": 3})));
        assert!(matches_filter(
            &body,
            &json!({"restaurant_id": 3, "is_active": true})
        ));
        assert!(!matches_filter(&body, &json!({"restaurant_id": 4})));
        assert!(!matches_filter(&body, &json!({"missing": 1})));
    }

    #[test]
    fn test_reference_ids() {
        assert_eq!(Reference::one("user", "users", 5).ids(), vec![5]);
        assert_eq!(
            Reference::many("attractions", "attractions", vec![1, 2]).ids(),
            vec![1, 2]
        );
    }
}
