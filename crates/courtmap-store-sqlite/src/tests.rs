//! Integration tests for the SQLite document store and the blob store.

use courtmap_core::{
  backend::{ContentStore, DocumentStore},
  document::{Fields, Filter, OrderBy},
};
use serde_json::json;

use crate::{DirContentStore, Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn court(name: &str, indoor: bool, created_at: &str) -> Fields {
  Fields::new()
    .set("name", name)
    .set("isIndoor", indoor)
    .set("createdAt", created_at)
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_round_trip() {
  let s = store().await;

  let id = s
    .insert("locations", court("Court A", true, "2024-03-01T10:00:00+00:00"))
    .await
    .unwrap();

  let doc = s.get("locations", &id).await.unwrap().expect("document");
  assert_eq!(doc.id, id);
  assert_eq!(doc.body["name"], json!("Court A"));
  assert_eq!(doc.body["isIndoor"], json!(true));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get("locations", "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn insert_resolves_server_time_to_rfc3339() {
  let s = store().await;

  let id = s
    .insert(
      "locations",
      Fields::new().set("name", "Court A").server_time("createdAt"),
    )
    .await
    .unwrap();

  let doc = s.get("locations", &id).await.unwrap().unwrap();
  let raw = doc.body["createdAt"].as_str().expect("timestamp string");
  chrono::DateTime::parse_from_rfc3339(raw).expect("valid RFC 3339");
}

#[tokio::test]
async fn query_filters_by_equality() {
  let s = store().await;
  s.insert("locations", court("A", true, "2024-01-01T00:00:00+00:00"))
    .await
    .unwrap();
  s.insert("locations", court("B", false, "2024-01-02T00:00:00+00:00"))
    .await
    .unwrap();
  s.insert("locations", court("C", true, "2024-01-03T00:00:00+00:00"))
    .await
    .unwrap();

  let indoor = s
    .query("locations", &[Filter::equals("isIndoor", true)], None)
    .await
    .unwrap();
  assert_eq!(indoor.len(), 2);

  let named = s
    .query("locations", &[Filter::equals("name", "B")], None)
    .await
    .unwrap();
  assert_eq!(named.len(), 1);
  assert_eq!(named[0].body["isIndoor"], json!(false));
}

#[tokio::test]
async fn query_orders_by_field_descending() {
  let s = store().await;
  s.insert("locations", court("old", true, "2024-01-01T00:00:00+00:00"))
    .await
    .unwrap();
  s.insert("locations", court("new", true, "2024-06-01T00:00:00+00:00"))
    .await
    .unwrap();
  s.insert("locations", court("mid", true, "2024-03-01T00:00:00+00:00"))
    .await
    .unwrap();

  let docs = s
    .query("locations", &[], Some(OrderBy::desc("createdAt")))
    .await
    .unwrap();

  let names: Vec<_> = docs.iter().map(|d| d.body["name"].clone()).collect();
  assert_eq!(names, vec![json!("new"), json!("mid"), json!("old")]);
}

#[tokio::test]
async fn query_scopes_to_collection() {
  let s = store().await;
  s.insert("locations", court("A", true, "2024-01-01T00:00:00+00:00"))
    .await
    .unwrap();
  s.insert("comments", Fields::new().set("text", "hi"))
    .await
    .unwrap();

  assert_eq!(s.query("locations", &[], None).await.unwrap().len(), 1);
  assert_eq!(s.query("comments", &[], None).await.unwrap().len(), 1);
  assert_eq!(s.query("reports", &[], None).await.unwrap().len(), 0);
}

#[tokio::test]
async fn query_rejects_structured_filter_values() {
  let s = store().await;
  let err = s
    .query(
      "locations",
      &[Filter::equals("coordinates", json!({ "lat": 1.0 }))],
      None,
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::UnsupportedFilter(_)));
}

#[tokio::test]
async fn merge_creates_the_document_when_absent() {
  let s = store().await;

  s.merge("users", "uid-1", Fields::new().set("email", "a@example.com"))
    .await
    .unwrap();

  let doc = s.get("users", "uid-1").await.unwrap().expect("upserted");
  assert_eq!(doc.body["email"], json!("a@example.com"));
}

#[tokio::test]
async fn merge_preserves_unspecified_fields() {
  let s = store().await;

  s.merge(
    "users",
    "uid-1",
    Fields::new()
      .set("email", "a@example.com")
      .set("displayName", "Alice"),
  )
  .await
  .unwrap();
  s.merge("users", "uid-1", Fields::new().set("displayName", "Alicia"))
    .await
    .unwrap();

  let doc = s.get("users", "uid-1").await.unwrap().unwrap();
  assert_eq!(doc.body["displayName"], json!("Alicia"));
  assert_eq!(doc.body["email"], json!("a@example.com"));
}

#[tokio::test]
async fn remove_is_idempotent() {
  let s = store().await;
  let id = s
    .insert("locations", court("A", true, "2024-01-01T00:00:00+00:00"))
    .await
    .unwrap();

  s.remove("locations", &id).await.unwrap();
  assert!(s.get("locations", &id).await.unwrap().is_none());

  // A second remove of the same id is not an error.
  s.remove("locations", &id).await.unwrap();
}

// ─── Blob store ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_then_resolve_public_url() {
  let dir = tempfile::tempdir().unwrap();
  let content = DirContentStore::new(dir.path());

  let handle = content
    .put("locations/loc-1/12345-court.jpg", b"jpeg bytes".to_vec())
    .await
    .unwrap();

  let stored = dir.path().join("locations/loc-1/12345-court.jpg");
  assert_eq!(std::fs::read(&stored).unwrap(), b"jpeg bytes");

  let url = content.public_url(&handle).await.unwrap();
  assert!(url.starts_with("file://"));
  assert!(url.ends_with("12345-court.jpg"));
}

#[tokio::test]
async fn put_rejects_escaping_paths() {
  let dir = tempfile::tempdir().unwrap();
  let content = DirContentStore::new(dir.path());

  for path in ["../outside.jpg", "/etc/passwd", ""] {
    let err = content.put(path, vec![1]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidPath(_)), "path {path:?}");
  }
}
