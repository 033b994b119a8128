//! Catalog service
//!
//! Serves the static course and blog listings. The catalog is built once at
//! startup and shared read-only between all requests.

use std::sync::Arc;

use crate::models::{BlogPost, Catalog, Course};

#[derive(Debug, Clone)]
pub struct CatalogService {
    catalog: Arc<Catalog>,
}

impl CatalogService {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Service over the published catalog
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin())
    }

    pub fn courses(&self) -> &[Course] {
        &self.catalog.courses
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.catalog.posts
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::builtin()
    }
}
