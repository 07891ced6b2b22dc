//! Port contracts for task document storage.
//!
//! Ports define infrastructure-agnostic interfaces used by the repository
//! service.

pub mod store;

pub use store::{DocumentStore, StoreResult};
