//! Construction options for [`TaskRepository`](super::TaskRepository).

use crate::task::domain::CollectionNamespace;
use serde::{Deserialize, Serialize};

/// Database used when none is configured.
pub const DEFAULT_DATABASE_NAME: &str = "task_service";

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION_NAME: &str = "tasks";

/// Location of the task collection within a document store.
///
/// Missing fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRepositoryConfig {
    /// Logical database name.
    pub database_name: String,
    /// Collection holding task documents.
    pub collection_name: String,
}

impl Default for TaskRepositoryConfig {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_owned(),
            collection_name: DEFAULT_COLLECTION_NAME.to_owned(),
        }
    }
}

impl TaskRepositoryConfig {
    /// Sets the database name.
    #[must_use]
    pub fn with_database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = database_name.into();
        self
    }

    /// Sets the collection name.
    #[must_use]
    pub fn with_collection_name(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = collection_name.into();
        self
    }

    /// Returns the namespace addressed by this configuration.
    #[must_use]
    pub fn namespace(&self) -> CollectionNamespace {
        CollectionNamespace::new(self.database_name.as_str(), self.collection_name.as_str())
    }
}
