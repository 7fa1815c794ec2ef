//! [`SqliteStore`] — the SQLite implementation of
//! [`DocumentStore`](courtmap_core::backend::DocumentStore).

use std::path::Path;

use chrono::Utc;
use courtmap_core::{
  backend::DocumentStore,
  document::{Direction, Document, Fields, Filter, OrderBy},
};
use rusqlite::OptionalExtension as _;
use serde_json::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{json_path, resolve_fields, sql_value},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A courtmap document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn decode_document(id: String, raw: &str) -> Result<Document> {
  let body: serde_json::Map<String, Value> = serde_json::from_str(raw)?;
  Ok(Document { id, body })
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn query(
    &self,
    collection: &str,
    filters: &[Filter],
    order: Option<OrderBy>,
  ) -> Result<Vec<Document>> {
    use rusqlite::types::Value as Sql;

    // Filters and ordering compile to json_extract over the body, with the
    // JSON path bound as a parameter alongside the compared value.
    let mut sql =
      String::from("SELECT doc_id, body FROM documents WHERE collection = ?1");
    let mut params: Vec<Sql> = vec![Sql::Text(collection.to_owned())];

    for filter in filters {
      let path_idx = params.len() + 1;
      params.push(Sql::Text(json_path(&filter.field)));
      let value_idx = params.len() + 1;
      params.push(sql_value(&filter.field, &filter.equals)?);
      sql.push_str(&format!(
        " AND json_extract(body, ?{path_idx}) = ?{value_idx}"
      ));
    }

    if let Some(order) = &order {
      let path_idx = params.len() + 1;
      params.push(Sql::Text(json_path(&order.field)));
      let dir = match order.direction {
        Direction::Ascending => "ASC",
        Direction::Descending => "DESC",
      };
      sql.push_str(&format!(" ORDER BY json_extract(body, ?{path_idx}) {dir}"));
    }

    let rows: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, raw)| decode_document(id, &raw))
      .collect()
  }

  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
    let collection = collection.to_owned();
    let id_param = id.to_owned();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
              rusqlite::params![collection, id_param],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(|raw| decode_document(id.to_owned(), &raw)).transpose()
  }

  async fn insert(&self, collection: &str, fields: Fields) -> Result<String> {
    let id = Uuid::new_v4().hyphenated().to_string();
    let raw = Value::Object(resolve_fields(fields, Utc::now())).to_string();

    let collection_param = collection.to_owned();
    let id_param = id.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)",
          rusqlite::params![collection_param, id_param, raw],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(collection, %id, "document inserted");
    Ok(id)
  }

  async fn merge(&self, collection: &str, id: &str, fields: Fields) -> Result<()> {
    let patch = resolve_fields(fields, Utc::now());
    let collection_param = collection.to_owned();
    let id_param = id.to_owned();

    // Read and write under one connection call; the connection runs on a
    // single thread, so the merge cannot interleave with another writer.
    self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
            rusqlite::params![collection_param, id_param],
            |row| row.get(0),
          )
          .optional()?;

        let mut body: serde_json::Map<String, Value> = match existing {
          Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?,
          None => serde_json::Map::new(),
        };
        for (name, value) in patch {
          body.insert(name, value);
        }

        let raw = Value::Object(body).to_string();
        conn.execute(
          "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)
           ON CONFLICT(collection, doc_id) DO UPDATE SET body = excluded.body",
          rusqlite::params![collection_param, id_param, raw],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(collection, id, "document merged");
    Ok(())
  }

  async fn remove(&self, collection: &str, id: &str) -> Result<()> {
    let collection_param = collection.to_owned();
    let id_param = id.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
          rusqlite::params![collection_param, id_param],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(collection, id, "document removed");
    Ok(())
  }
}
