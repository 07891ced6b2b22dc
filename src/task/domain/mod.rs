//! Domain model for task document storage.
//!
//! Identifiers, schema-less document bodies and aggregation records. No
//! type here depends on a concrete store.

mod document;
mod error;
mod ids;
mod namespace;
mod outcome;
mod tag_count;

pub use document::{Document, ID_FIELD, TAGS_FIELD};
pub use error::{DocumentError, ObjectIdError};
pub use ids::{ObjectId, ObjectIdGenerator};
pub use namespace::CollectionNamespace;
pub use outcome::DeleteOutcome;
pub use tag_count::TagCount;
