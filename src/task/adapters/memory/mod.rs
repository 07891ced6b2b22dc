//! In-memory document store.

mod store;

pub use store::{InMemoryDocumentStore, MemoryStoreError};
