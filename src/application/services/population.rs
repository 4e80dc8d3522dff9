//! Replaces reference ids with the referenced documents.

use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::application::services::catalog_service::{Visibility, is_active};
use crate::domain::document::{Document, ReferenceTarget, StoredDocument};
use crate::domain::repositories::DocumentRepository;
use crate::error::AppError;

type Resolved = HashMap<(&'static str, i64), Value>;

/// Builds public views of `documents`, embedding every referenced document.
///
/// References are fetched with one `find_many` per referenced collection for
/// the whole batch. A missing single reference embeds as `null`; missing
/// entries of a list reference are skipped. Under [`Visibility::Public`] an
/// inactive referenced document counts as missing.
pub async fn populate_many<T, R>(
    repository: &R,
    documents: Vec<StoredDocument>,
    visibility: Visibility,
) -> Result<Vec<Value>, AppError>
where
    T: Document,
    R: DocumentRepository + ?Sized,
{
    let mut decoded = Vec::with_capacity(documents.len());
    let mut wanted: HashMap<&'static str, BTreeSet<i64>> = HashMap::new();

    for stored in documents {
        let references = serde_json::from_value::<T>(stored.body.clone())?.references();
        for reference in &references {
            wanted
                .entry(reference.collection)
                .or_default()
                .extend(reference.ids());
        }
        decoded.push((stored, references));
    }

    let mut resolved: Resolved = HashMap::new();
    for (collection, ids) in wanted {
        if ids.is_empty() {
            continue;
        }
        let found = repository
            .find_many(collection, ids.into_iter().collect())
            .await?;
        for document in found {
            if visibility == Visibility::Public && !is_active(&document.body) {
                continue;
            }
            resolved.insert((collection, document.id), document.to_public_json());
        }
    }

    Ok(decoded
        .into_iter()
        .map(|(stored, references)| {
            let mut view = stored.to_public_json();
            if let Value::Object(map) = &mut view {
                for reference in references {
                    let value = match reference.target {
                        ReferenceTarget::One(id) => resolved
                            .get(&(reference.collection, id))
                            .cloned()
                            .unwrap_or(Value::Null),
                        ReferenceTarget::Many(ids) => Value::Array(
                            ids.iter()
                                .filter_map(|id| resolved.get(&(reference.collection, *id)))
                                .cloned()
                                .collect(),
                        ),
                    };
                    map.insert(reference.field.to_string(), value);
                }
            }
            view
        })
        .collect())
}

/// Single-document form of [`populate_many`].
pub async fn populate<T, R>(
    repository: &R,
    document: StoredDocument,
    visibility: Visibility,
) -> Result<Value, AppError>
where
    T: Document,
    R: DocumentRepository + ?Sized,
{
    Ok(populate_many::<T, R>(repository, vec![document], visibility)
        .await?
        .pop()
        .unwrap_or(Value::Null))
}
