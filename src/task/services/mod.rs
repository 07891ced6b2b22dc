//! Repository service for task documents.

mod config;
mod repository;

pub use config::{DEFAULT_COLLECTION_NAME, DEFAULT_DATABASE_NAME, TaskRepositoryConfig};
pub use repository::TaskRepository;
