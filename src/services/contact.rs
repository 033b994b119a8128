//! Contact service
//!
//! Validates contact submissions against the configured schema and stores
//! them as documents. Invalid submissions never reach the datastore.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ContactConfig;
use crate::db::repositories::DocumentRepository;
use crate::error::{AppError, AppResult};
use crate::models::{ContactMessage, ContactSchema};

pub struct ContactService {
    documents: Option<Arc<dyn DocumentRepository>>,
    collection: String,
    schema: ContactSchema,
}

impl ContactService {
    pub fn new(documents: Option<Arc<dyn DocumentRepository>>, config: &ContactConfig) -> Self {
        Self {
            documents,
            collection: config.collection.clone(),
            schema: ContactSchema::from(config),
        }
    }

    /// Validate and store a submission, returning the new document id
    pub async fn submit(&self, payload: Value) -> AppResult<String> {
        let message = ContactMessage::from_value(payload, &self.schema)?;
        self.store(message).await
    }

    async fn store(&self, message: ContactMessage) -> AppResult<String> {
        let documents = self.documents.as_ref().ok_or(AppError::DatabaseNotConfigured)?;

        let id = documents
            .insert_one(&self.collection, message.into_value())
            .await
            .map_err(|e| {
                tracing::warn!(collection = %self.collection, "Failed to store contact message: {:#}", e);
                AppError::Datastore(e)
            })?;

        tracing::info!(collection = %self.collection, id = %id, "Contact message stored");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxDocumentRepository;
    use crate::db::{create_test_pool, migrations::run_migrations};
    use serde_json::json;

    async fn repo() -> Arc<dyn DocumentRepository> {
        let pool = create_test_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqlxDocumentRepository::boxed(pool)
    }

    fn valid_payload() -> Value {
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello" })
    }

    #[tokio::test]
    async fn test_submit_stores_one_document() {
        let repo = repo().await;
        let service = ContactService::new(Some(repo.clone()), &ContactConfig::default());

        let id = service.submit(valid_payload()).await.unwrap();
        assert!(!id.is_empty());

        let docs = repo.find("contactmessage", None, None).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].data["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_invalid_payload_never_written() {
        let repo = repo().await;
        let service = ContactService::new(Some(repo.clone()), &ContactConfig::default());

        let err = service.submit(json!({ "name": "Ada" })).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(repo.count("contactmessage").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validation_runs_before_configuration_check() {
        let service = ContactService::new(None, &ContactConfig::default());
        assert!(matches!(
            service.submit(json!({})).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.submit(valid_payload()).await,
            Err(AppError::DatabaseNotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_custom_collection() {
        let repo = repo().await;
        let config = ContactConfig {
            collection: "leads".to_string(),
            ..ContactConfig::default()
        };
        let service = ContactService::new(Some(repo.clone()), &config);

        service.submit(valid_payload()).await.unwrap();
        assert_eq!(repo.count("leads").await.unwrap(), 1);
        assert_eq!(repo.count("contactmessage").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_datastore_failure_is_reported() {
        // No migrations: the insert fails
        let pool = create_test_pool().await.unwrap();
        let service = ContactService::new(
            Some(SqlxDocumentRepository::boxed(pool)),
            &ContactConfig::default(),
        );
        let err = service.submit(valid_payload()).await.unwrap_err();
        assert!(matches!(err, AppError::Datastore(_)));
        assert!(err.to_string().starts_with("Failed to insert document"));
    }
}
