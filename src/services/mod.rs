//! Services layer
//!
//! Sits between the HTTP handlers and the datastore:
//! - Catalog listings
//! - Contact submission validation and storage
//! - Datastore connectivity check

pub mod catalog;
pub mod contact;
pub mod health;

pub use catalog::CatalogService;
pub use contact::ContactService;
pub use health::HealthService;
