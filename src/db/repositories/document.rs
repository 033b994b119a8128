//! Document repository
//!
//! A minimal document store on top of the relational pool: every document is
//! one row of the `documents` table, grouped by collection name, with its body
//! kept as JSON text.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::DynDatabasePool;
use crate::models::Document;

/// Longest accepted collection name
pub const MAX_COLLECTION_NAME_LEN: usize = 100;

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a JSON object into `collection`, returning the generated id
    async fn insert_one(&self, collection: &str, data: Value) -> Result<String>;

    /// Names of all collections holding at least one document, sorted
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Documents of `collection`, oldest first, matching every field of `filter`
    async fn find(
        &self,
        collection: &str,
        filter: Option<&Map<String, Value>>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>>;

    /// Number of documents in `collection`
    async fn count(&self, collection: &str) -> Result<i64>;
}

pub struct SqlxDocumentRepository {
    pool: DynDatabasePool,
}

impl SqlxDocumentRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn DocumentRepository> {
        Arc::new(Self::new(pool))
    }

    fn unsupported(&self) -> anyhow::Error {
        anyhow!("Unsupported database driver: {:?}", self.pool.driver())
    }
}

#[async_trait]
impl DocumentRepository for SqlxDocumentRepository {
    async fn insert_one(&self, collection: &str, data: Value) -> Result<String> {
        validate_collection_name(collection)?;

        let now = Utc::now();
        let doc = stamp(data, now)?;
        let id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(&doc).context("Failed to serialize document")?;
        let ts = format_timestamp(now);

        if let Some(pool) = self.pool.as_sqlite() {
            insert_sqlite(pool, &id, collection, &body, &ts).await?;
        } else if let Some(pool) = self.pool.as_mysql() {
            insert_mysql(pool, &id, collection, &body, &ts).await?;
        } else {
            return Err(self.unsupported());
        }

        tracing::debug!(collection, id = %id, "Inserted document");
        Ok(id)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        if let Some(pool) = self.pool.as_sqlite() {
            list_collections_sqlite(pool).await
        } else if let Some(pool) = self.pool.as_mysql() {
            list_collections_mysql(pool).await
        } else {
            Err(self.unsupported())
        }
    }

    async fn find(
        &self,
        collection: &str,
        filter: Option<&Map<String, Value>>,
        limit: Option<usize>,
    ) -> Result<Vec<Document>> {
        validate_collection_name(collection)?;
        let conditions = filter_conditions(filter)?;
        let limit = limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX));

        if let Some(pool) = self.pool.as_sqlite() {
            find_sqlite(pool, collection, &conditions, limit).await
        } else if let Some(pool) = self.pool.as_mysql() {
            find_mysql(pool, collection, &conditions, limit).await
        } else {
            Err(self.unsupported())
        }
    }

    async fn count(&self, collection: &str) -> Result<i64> {
        validate_collection_name(collection)?;

        if let Some(pool) = self.pool.as_sqlite() {
            count_sqlite(pool, collection).await
        } else if let Some(pool) = self.pool.as_mysql() {
            count_mysql(pool, collection).await
        } else {
            Err(self.unsupported())
        }
    }
}

/// Collection names are limited to ASCII alphanumerics, `_` and `-`
pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Collection name must not be empty");
    }
    if name.len() > MAX_COLLECTION_NAME_LEN {
        bail!(
            "Collection name must be at most {} characters",
            MAX_COLLECTION_NAME_LEN
        );
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!("Invalid collection name: {}", name);
    }
    Ok(())
}

/// Add `created_at` / `updated_at` to a document body
fn stamp(data: Value, now: DateTime<Utc>) -> Result<Value> {
    let mut fields = match data {
        Value::Object(fields) => fields,
        _ => bail!("Document must be a JSON object"),
    };
    let ts = Value::String(format_timestamp(now));
    fields.insert("created_at".to_string(), ts.clone());
    fields.insert("updated_at".to_string(), ts);
    Ok(Value::Object(fields))
}

/// One equality condition of a `find` filter: JSON path plus expected value as JSON text
struct FieldCondition {
    path: String,
    expected: String,
}

fn filter_conditions(filter: Option<&Map<String, Value>>) -> Result<Vec<FieldCondition>> {
    let Some(filter) = filter else {
        return Ok(Vec::new());
    };

    filter
        .iter()
        .map(|(key, expected)| {
            if key.contains('"') || key.contains('\\') {
                bail!("Unsupported filter field: {}", key);
            }
            Ok(FieldCondition {
                path: format!("$.\"{}\"", key),
                expected: serde_json::to_string(expected).context("Failed to serialize filter")?,
            })
        })
        .collect()
}

/// `SELECT` for `find`; `condition` is the per-field SQL taking path, path, value
fn find_sql(condition: &str, conditions: usize, limited: bool) -> String {
    let mut sql = String::from(
        "SELECT id, collection, data, created_at, updated_at FROM documents WHERE collection = ?",
    );
    for _ in 0..conditions {
        sql.push_str(" AND ");
        sql.push_str(condition);
    }
    sql.push_str(" ORDER BY seq");
    if limited {
        sql.push_str(" LIMIT ?");
    }
    sql
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid stored timestamp: {}", raw))?
        .with_timezone(&Utc))
}

fn document_from_parts(
    id: String,
    collection: String,
    data: &str,
    created_at: &str,
    updated_at: &str,
) -> Result<Document> {
    Ok(Document {
        data: serde_json::from_str(data)
            .with_context(|| format!("Corrupt document body for {}", id))?,
        created_at: parse_timestamp(created_at)?,
        updated_at: parse_timestamp(updated_at)?,
        id,
        collection,
    })
}

// SQLite implementations
async fn insert_sqlite(pool: &SqlitePool, id: &str, collection: &str, body: &str, ts: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO documents (id, collection, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(collection)
    .bind(body)
    .bind(ts)
    .bind(ts)
    .execute(pool)
    .await
    .context("Failed to insert document")?;
    Ok(())
}

async fn list_collections_sqlite(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT DISTINCT collection FROM documents ORDER BY collection")
        .fetch_all(pool)
        .await
        .context("Failed to list collections")?;
    Ok(rows.iter().map(|r| r.get("collection")).collect())
}

async fn find_sqlite(
    pool: &SqlitePool,
    collection: &str,
    conditions: &[FieldCondition],
    limit: Option<i64>,
) -> Result<Vec<Document>> {
    let sql = find_sql(
        "(json_type(data, ?) IS NOT NULL AND json_extract(data, ?) IS json_extract(?, '$'))",
        conditions.len(),
        limit.is_some(),
    );

    let mut query = sqlx::query(&sql).bind(collection);
    for c in conditions {
        query = query
            .bind(c.path.as_str())
            .bind(c.path.as_str())
            .bind(c.expected.as_str());
    }
    if let Some(limit) = limit {
        query = query.bind(limit);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to query documents")?;

    rows.iter()
        .map(|r| {
            document_from_parts(
                r.get("id"),
                r.get("collection"),
                r.get::<&str, _>("data"),
                r.get::<&str, _>("created_at"),
                r.get::<&str, _>("updated_at"),
            )
        })
        .collect()
}

async fn count_sqlite(pool: &SqlitePool, collection: &str) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM documents WHERE collection = ?")
        .bind(collection)
        .fetch_one(pool)
        .await
        .context("Failed to count documents")?;
    Ok(row.get("count"))
}

// MySQL implementations
async fn insert_mysql(pool: &MySqlPool, id: &str, collection: &str, body: &str, ts: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO documents (id, collection, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(collection)
    .bind(body)
    .bind(ts)
    .bind(ts)
    .execute(pool)
    .await
    .context("Failed to insert document")?;
    Ok(())
}

async fn list_collections_mysql(pool: &MySqlPool) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT DISTINCT collection FROM documents ORDER BY collection")
        .fetch_all(pool)
        .await
        .context("Failed to list collections")?;
    Ok(rows.iter().map(|r| r.get("collection")).collect())
}

async fn find_mysql(
    pool: &MySqlPool,
    collection: &str,
    conditions: &[FieldCondition],
    limit: Option<i64>,
) -> Result<Vec<Document>> {
    let sql = find_sql(
        "(JSON_CONTAINS_PATH(data, 'one', ?) AND JSON_EXTRACT(data, ?) = CAST(? AS JSON))",
        conditions.len(),
        limit.is_some(),
    );

    let mut query = sqlx::query(&sql).bind(collection);
    for c in conditions {
        query = query
            .bind(c.path.as_str())
            .bind(c.path.as_str())
            .bind(c.expected.as_str());
    }
    if let Some(limit) = limit {
        query = query.bind(limit);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to query documents")?;

    rows.iter()
        .map(|r| {
            document_from_parts(
                r.get("id"),
                r.get("collection"),
                r.get::<&str, _>("data"),
                r.get::<&str, _>("created_at"),
                r.get::<&str, _>("updated_at"),
            )
        })
        .collect()
}

async fn count_mysql(pool: &MySqlPool, collection: &str) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM documents WHERE collection = ?")
        .bind(collection)
        .fetch_one(pool)
        .await
        .context("Failed to count documents")?;
    Ok(row.get("count"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations::run_migrations};
    use serde_json::json;

    async fn setup() -> SqlxDocumentRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxDocumentRepository::new(pool)
    }

    #[tokio::test]
    async fn test_insert_returns_unique_ids() {
        let repo = setup().await;

        let a = repo.insert_one("contactmessage", json!({ "name": "Ada" })).await.unwrap();
        let b = repo.insert_one("contactmessage", json!({ "name": "Ada" })).await.unwrap();

        assert!(Uuid::parse_str(&a).is_ok());
        assert_ne!(a, b);
        // No idempotence: duplicates are stored twice
        assert_eq!(repo.count("contactmessage").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_stamps_timestamps() {
        let repo = setup().await;
        let id = repo
            .insert_one("contactmessage", json!({ "email": "a@b.com" }))
            .await
            .unwrap();

        let docs = repo.find("contactmessage", None, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.id, id);
        assert_eq!(doc.collection, "contactmessage");
        assert_eq!(doc.data["email"], "a@b.com");
        assert!(doc.data["created_at"].is_string());
        assert_eq!(doc.data["created_at"], doc.data["updated_at"]);
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[tokio::test]
    async fn test_insert_rejects_non_object() {
        let repo = setup().await;
        let err = repo.insert_one("contactmessage", json!("text")).await.unwrap_err();
        assert!(err.to_string().contains("JSON object"));
        assert_eq!(repo.count("contactmessage").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_collections() {
        let repo = setup().await;
        assert!(repo.list_collections().await.unwrap().is_empty());

        repo.insert_one("newsletter", json!({})).await.unwrap();
        repo.insert_one("contactmessage", json!({})).await.unwrap();
        repo.insert_one("contactmessage", json!({})).await.unwrap();

        assert_eq!(
            repo.list_collections().await.unwrap(),
            vec!["contactmessage", "newsletter"]
        );
    }

    #[tokio::test]
    async fn test_find_with_filter_and_limit() {
        let repo = setup().await;
        for (i, topic) in ["teams", "solo", "teams", "teams"].iter().enumerate() {
            repo.insert_one("contactmessage", json!({ "n": i, "topic": topic }))
                .await
                .unwrap();
        }
        repo.insert_one("other", json!({ "topic": "teams" })).await.unwrap();

        let filter = json!({ "topic": "teams" });
        let docs = repo
            .find("contactmessage", filter.as_object(), None)
            .await
            .unwrap();
        let order: Vec<i64> = docs.iter().map(|d| d.data["n"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![0, 2, 3]);

        let docs = repo
            .find("contactmessage", filter.as_object(), Some(2))
            .await
            .unwrap();
        let order: Vec<i64> = docs.iter().map(|d| d.data["n"].as_i64().unwrap()).collect();
        assert_eq!(order, vec![0, 2]);

        let docs = repo.find("contactmessage", None, Some(1)).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].data["n"], 0);
    }

    #[tokio::test]
    async fn test_find_filter_value_types() {
        let repo = setup().await;
        repo.insert_one("leads", json!({ "k": 1, "flag": true, "meta": { "a": [1, 2] }, "note": null }))
            .await
            .unwrap();
        repo.insert_one("leads", json!({ "k": "1", "flag": false }))
            .await
            .unwrap();

        let count = |filter: Value| {
            let repo = &repo;
            async move { repo.find("leads", filter.as_object(), None).await.unwrap().len() }
        };

        assert_eq!(count(json!({ "k": 1 })).await, 1);
        assert_eq!(count(json!({ "k": "1" })).await, 1);
        assert_eq!(count(json!({ "flag": true })).await, 1);
        assert_eq!(count(json!({ "meta": { "a": [1, 2] } })).await, 1);
        assert_eq!(count(json!({ "meta": { "a": [2, 1] } })).await, 0);
        // Stored null matches, an absent field does not
        assert_eq!(count(json!({ "note": null })).await, 1);
        assert_eq!(count(json!({ "missing": null })).await, 0);
        assert_eq!(count(json!({})).await, 2);
    }

    #[tokio::test]
    async fn test_find_rejects_quoted_filter_field() {
        let repo = setup().await;
        let filter = json!({ "a\"b": 1 });
        assert!(repo.find("leads", filter.as_object(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_collection_rejected() {
        let repo = setup().await;
        assert!(repo.insert_one("", json!({})).await.is_err());
        assert!(repo.insert_one("bad name", json!({})).await.is_err());
        assert!(repo.count("x;DROP").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_table_surfaces_error() {
        let pool = create_test_pool().await.unwrap();
        let repo = SqlxDocumentRepository::new(pool);
        let err = repo.insert_one("contactmessage", json!({})).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to insert document"));
    }

    #[test]
    fn test_validate_collection_name() {
        assert!(validate_collection_name("contactmessage").is_ok());
        assert!(validate_collection_name("contact-message_2").is_ok());
        assert!(validate_collection_name(&"a".repeat(MAX_COLLECTION_NAME_LEN)).is_ok());
        assert!(validate_collection_name(&"a".repeat(MAX_COLLECTION_NAME_LEN + 1)).is_err());
        assert!(validate_collection_name("a.b").is_err());
    }
}
