//! Stored document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document as held by the document store.
///
/// `data` carries the submitted fields plus the `created_at` / `updated_at`
/// stamps added at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Generated identifier (UUID v4)
    pub id: String,
    /// Name of the collection the document belongs to
    pub collection: String,
    /// Document body
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
