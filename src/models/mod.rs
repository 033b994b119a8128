//! Data models
//!
//! - Static catalog records (Course, BlogPost)
//! - Contact submissions and their schema
//! - Stored documents

mod catalog;
mod contact;
mod document;

pub use catalog::{BlogPost, Catalog, Course, CourseLevel};
pub use contact::{ContactMessage, ContactSchema, ContactValidationError};
pub use document::Document;
