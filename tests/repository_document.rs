use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tourism_portal::domain::repositories::{DocumentQuery, DocumentRepository};
use tourism_portal::error::AppError;
use tourism_portal::infrastructure::persistence::PgDocumentRepository;

#[sqlx::test]
async fn test_insert_and_find_by_id(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    let stored = repo
        .insert("attractions", json!({"name": "Goa Pindul", "is_active": true}))
        .await
        .unwrap();

    assert_eq!(stored.collection, "attractions");

    let found = repo.find_by_id("attractions", stored.id).await.unwrap();
    assert_eq!(found.unwrap().body["name"], "Goa Pindul");
}

#[sqlx::test]
async fn test_find_by_id_is_scoped_to_collection(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    let stored = repo
        .insert("attractions", json!({"name": "Goa Pindul"}))
        .await
        .unwrap();

    let found = repo.find_by_id("restaurants", stored.id).await.unwrap();
    assert!(found.is_none());
}

#[sqlx::test]
async fn test_find_many_skips_missing(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    let a = repo.insert("restaurants", json!({"name": "A"})).await.unwrap();
    let b = repo.insert("restaurants", json!({"name": "B"})).await.unwrap();

    let found = repo
        .find_many("restaurants", vec![b.id, a.id, 999_999])
        .await
        .unwrap();

    let ids: Vec<i64> = found.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[sqlx::test]
async fn test_list_filters_searches_and_paginates(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    for (name, category) in [
        ("Goa Pindul", "cave"),
        ("Goa Jomblang", "cave"),
        ("Pantai Indrayanti", "beach"),
    ] {
        repo.insert(
            "attractions",
            json!({"name": name, "category": category, "is_active": true}),
        )
        .await
        .unwrap();
    }

    let caves = repo
        .list(
            "attractions",
            DocumentQuery::new(0, 10).with_field("category", "cave"),
        )
        .await
        .unwrap();
    assert_eq!(caves.total, 2);

    let search = repo
        .list(
            "attractions",
            DocumentQuery::new(0, 10).with_search(Some("JOMB".to_string())),
        )
        .await
        .unwrap();
    assert_eq!(search.total, 1);
    assert_eq!(search.items[0].body["name"], "Goa Jomblang");

    let page = repo
        .list("attractions", DocumentQuery::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].body["name"], "Goa Pindul");
}

#[sqlx::test]
async fn test_replace_and_delete(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    let stored = repo.insert("news", json!({"title": "Old"})).await.unwrap();

    let replaced = repo
        .replace("news", stored.id, json!({"title": "New"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.body["title"], "New");
    assert!(replaced.updated_at >= stored.updated_at);

    assert!(repo.delete("news", stored.id).await.unwrap());
    assert!(!repo.delete("news", stored.id).await.unwrap());
    assert!(
        repo.replace("news", stored.id, json!({"title": "Gone"}))
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test]
async fn test_duplicate_user_email_conflicts(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    repo.insert("users", json!({"email": "dewi@example.com"}))
        .await
        .unwrap();

    let result = repo
        .insert("users", json!({"email": "dewi@example.com"}))
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));

    let found = repo
        .find_one("users", json!({"email": "dewi@example.com"}))
        .await
        .unwrap();
    assert!(found.is_some());
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgDocumentRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
