//! Task service: document storage for tasks.
//!
//! This crate provides a repository that stores schema-less task documents
//! in a document store, looks them up and deletes them by string
//! identifier, and aggregates tag frequencies across the collection.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Identifiers, documents and aggregation records
//! - **Ports**: The document store contract the repository depends on
//! - **Adapters**: In-memory and `PostgreSQL` document stores
//!
//! # Modules
//!
//! - [`task`]: Task document repository and its storage adapters

pub mod task;
