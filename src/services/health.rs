//! Datastore connectivity check

use std::sync::Arc;

use crate::db::repositories::DocumentRepository;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct HealthService {
    documents: Option<Arc<dyn DocumentRepository>>,
}

impl HealthService {
    pub fn new(documents: Option<Arc<dyn DocumentRepository>>) -> Self {
        Self { documents }
    }

    /// List the datastore's collections to prove it is reachable
    pub async fn check_datastore(&self) -> AppResult<Vec<String>> {
        let documents = self.documents.as_ref().ok_or(AppError::DatabaseNotConfigured)?;
        documents.list_collections().await.map_err(|e| {
            tracing::warn!("Datastore check failed: {:#}", e);
            AppError::Datastore(e)
        })
    }
}
