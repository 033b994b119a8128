//! Database layer
//!
//! Provides the datastore behind the contact form. A trait-based pool
//! (`DatabasePool`) hides whether SQLite or MySQL is in use; the
//! `DocumentRepository` stores JSON documents grouped into named
//! collections on top of it.
//!
//! # Usage
//!
//! ```ignore
//! use elev8_api::db::{create_pool, migrations, repositories::SqlxDocumentRepository};
//!
//! let pool = create_pool(&config.database).await?;
//! migrations::run_migrations(&pool).await?;
//! let documents = SqlxDocumentRepository::boxed(pool);
//! let id = documents.insert_one("contactmessage", payload).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
