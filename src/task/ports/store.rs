//! Document store port: the connection handle the repository runs against.

use crate::task::domain::{CollectionNamespace, Document, ObjectId, TagCount};
use async_trait::async_trait;

/// Result type for operations on a [`DocumentStore`].
pub type StoreResult<T, S> = Result<T, <S as DocumentStore>::Error>;

/// Single-document operations and tag aggregation over named collections.
///
/// Implementations own identifier assignment and are responsible for the
/// durability and atomicity of each single-document write.
#[cfg_attr(test, mockall::automock(type Error = std::io::Error;))]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Failure type surfaced to callers unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Inserts `document` into `namespace` under a freshly assigned
    /// identifier and returns that identifier.
    ///
    /// The document must not carry an identifier field.
    async fn insert_one(
        &self,
        namespace: &CollectionNamespace,
        document: Document,
    ) -> Result<ObjectId, Self::Error>;

    /// Finds the document stored under `id`.
    ///
    /// The returned body excludes the identifier field. Returns `None` when
    /// no document matches.
    async fn find_one(
        &self,
        namespace: &CollectionNamespace,
        id: ObjectId,
    ) -> Result<Option<Document>, Self::Error>;

    /// Removes the document stored under `id` and returns how many documents
    /// were removed (zero or one).
    async fn delete_one(
        &self,
        namespace: &CollectionNamespace,
        id: ObjectId,
    ) -> Result<u64, Self::Error>;

    /// Unwinds `field` of every document in `namespace`, groups the entries
    /// by value and returns the group sizes in descending order.
    ///
    /// A missing, `null` or empty-array field contributes nothing; a
    /// non-array value contributes itself once. Entries are compared as JSON
    /// values: numbers by magnitude (`1` and `1.0` share a group) and objects
    /// regardless of key order. Each group reports one of its members as the
    /// tag. Tie order is unspecified.
    async fn count_unwound(
        &self,
        namespace: &CollectionNamespace,
        field: &str,
    ) -> Result<Vec<TagCount>, Self::Error>;
}
