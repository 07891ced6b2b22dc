//! `PostgreSQL` adapter for document persistence.

mod models;
mod schema;
mod store;

pub use store::{DocumentPgPool, PostgresDocumentStore, PostgresStoreError, PostgresStoreResult};
