//! Database repositories

pub mod document;

pub use document::{DocumentRepository, SqlxDocumentRepository};
