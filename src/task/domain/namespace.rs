//! Database and collection addressing.

use std::fmt;

/// Fully qualified collection name within a document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionNamespace {
    database: String,
    collection: String,
}

impl CollectionNamespace {
    /// Creates a namespace from database and collection names.
    #[must_use]
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }

    /// Returns the database name.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for CollectionNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
