//! API middleware and shared request plumbing
//!
//! Contains:
//! - Application state injected into every handler
//! - The error type handlers return, and its HTTP mapping
//! - CORS policy construction

use anyhow::{Context, Result};
use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::ContactConfig;
use crate::db::{repositories::SqlxDocumentRepository, DynDatabasePool};
use crate::error::AppError;
use crate::services::{CatalogService, ContactService, HealthService};

/// Application state containing shared services
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub contact_service: Arc<ContactService>,
    pub health_service: HealthService,
}

impl AppState {
    /// Wire services over an optional datastore handle
    pub fn new(pool: Option<DynDatabasePool>, contact: &ContactConfig) -> Self {
        let documents = pool.map(SqlxDocumentRepository::boxed);

        Self {
            catalog_service: CatalogService::builtin(),
            contact_service: Arc::new(ContactService::new(documents.clone(), contact)),
            health_service: HealthService::new(documents),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            code: code.into(),
        }
    }

    pub fn validation_error(detail: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", detail)
    }

    pub fn not_configured(detail: impl Into<String>) -> Self {
        Self::new("DATABASE_NOT_CONFIGURED", detail)
    }

    pub fn database_error(detail: impl Into<String>) -> Self {
        Self::new("DATABASE_ERROR", detail)
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", detail)
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "VALIDATION_ERROR" => StatusCode::UNPROCESSABLE_ENTITY,
            "BAD_REQUEST" => StatusCode::BAD_REQUEST,
            "PAYLOAD_TOO_LARGE" => StatusCode::PAYLOAD_TOO_LARGE,
            "UNSUPPORTED_MEDIA_TYPE" => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Bodies that parse but do not fit are validation errors; everything else
/// keeps the status axum assigned to the rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                Self::validation_error(detail)
            }
            other => match other.status() {
                StatusCode::PAYLOAD_TOO_LARGE => Self::new("PAYLOAD_TOO_LARGE", detail),
                StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::new("UNSUPPORTED_MEDIA_TYPE", detail),
                status if status.is_client_error() => Self::new("BAD_REQUEST", detail),
                _ => Self::internal_error(detail),
            },
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let detail = err.to_string();
        match err {
            AppError::Validation(_) => Self::validation_error(detail),
            AppError::DatabaseNotConfigured => Self::not_configured(detail),
            AppError::Datastore(_) => Self::database_error(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Build the CORS layer for the configured origin
///
/// `*` accepts any origin by echoing it back, as browsers refuse a literal
/// `*` on credentialed requests. Otherwise only the configured origin is
/// allowed. Methods and headers mirror the preflight request.
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = origin.trim();
    let allow_origin = if origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        let origin = origin
            .parse::<HeaderValue>()
            .with_context(|| format!("Invalid CORS origin: {}", origin))?;
        AllowOrigin::exact(origin)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_mapping() {
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::not_configured("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::database_error("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::internal_error("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::new("BAD_REQUEST", "x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::new("PAYLOAD_TOO_LARGE", "x").status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            ApiError::new("UNSUPPORTED_MEDIA_TYPE", "x").status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_from_app_error() {
        let err = ApiError::from(AppError::DatabaseNotConfigured);
        assert_eq!(err.code, "DATABASE_NOT_CONFIGURED");
        assert_eq!(err.detail, "Database not configured");

        let err = ApiError::from(AppError::Validation("email: field required".to_string()));
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.detail, "email: field required");

        let err = ApiError::from(AppError::Datastore(anyhow::anyhow!("connection refused")));
        assert_eq!(err.code, "DATABASE_ERROR");
        assert_eq!(err.detail, "connection refused");
    }

    #[test]
    fn test_api_error_body() {
        let body = serde_json::to_value(ApiError::not_configured("Database not configured")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "detail": "Database not configured", "code": "DATABASE_NOT_CONFIGURED" })
        );
    }

    #[test]
    fn test_cors_layer() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("https://elev8.example").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
