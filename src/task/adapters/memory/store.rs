//! Thread-safe in-memory document store.
//!
//! Collections keep documents in insertion order. Tag aggregation applies
//! the same unwind, group and sort semantics as a document database, with
//! ties ordered by first appearance.

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::num::FpCategory;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::task::{
    domain::{CollectionNamespace, Document, ID_FIELD, ObjectId, ObjectIdGenerator, TagCount},
    ports::DocumentStore,
};

/// Errors returned by [`InMemoryDocumentStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemoryStoreError {
    /// A writer panicked while holding the state lock.
    #[error("in-memory store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Thread-safe in-memory document store.
///
/// Clones share the same underlying collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<InMemoryStoreState>>,
    ids: Arc<ObjectIdGenerator>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    collections: HashMap<CollectionNamespace, Vec<StoredDocument>>,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    id: ObjectId,
    body: Document,
}

impl InMemoryDocumentStore {
    /// Creates an empty store stamping identifiers from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store stamping identifiers from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::default(),
            ids: Arc::new(ObjectIdGenerator::with_clock(clock)),
        }
    }

    /// Returns the number of documents stored in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryStoreError::LockPoisoned`] when the state lock is
    /// poisoned.
    pub fn len(&self, namespace: &CollectionNamespace) -> Result<usize, MemoryStoreError> {
        let state = self.read()?;
        Ok(state.collections.get(namespace).map_or(0, Vec::len))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, InMemoryStoreState>, MemoryStoreError> {
        self.state
            .read()
            .map_err(|err| MemoryStoreError::LockPoisoned(err.to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, InMemoryStoreState>, MemoryStoreError> {
        self.state
            .write()
            .map_err(|err| MemoryStoreError::LockPoisoned(err.to_string()))
    }
}

/// Expands one field value into the entries it contributes to a group.
fn unwind(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Appends a rendering of `value` that is identical for values equal as
/// JSON: numbers compare by magnitude and object keys are sorted.
fn push_group_key(value: &Value, key: &mut String) {
    match value {
        Value::Number(number) => key.push_str(&canonical_number(number)),
        Value::Array(items) => {
            key.push('[');
            for item in items {
                push_group_key(item, key);
                key.push(',');
            }
            key.push(']');
        }
        Value::Object(fields) => {
            let mut sorted: Vec<(&String, &Value)> = fields.iter().collect();
            sorted.sort_unstable_by(|left, right| left.0.cmp(right.0));
            key.push('{');
            for (name, field) in sorted {
                key.push_str(&Value::String(name.clone()).to_string());
                key.push(':');
                push_group_key(field, key);
                key.push(',');
            }
            key.push('}');
        }
        scalar => key.push_str(&scalar.to_string()),
    }
}

/// Renders integral numbers without a fractional part, whatever their
/// representation, and folds `-0.0` into `0`.
fn canonical_number(number: &Number) -> String {
    if let Some(integer) = number.as_i64() {
        return integer.to_string();
    }
    if let Some(integer) = number.as_u64() {
        return integer.to_string();
    }
    match number.as_f64() {
        Some(float) if float.classify() == FpCategory::Zero => "0".to_owned(),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

fn group_key(value: &Value) -> String {
    let mut key = String::new();
    push_group_key(value, &mut key);
    key
}

/// Groups unwound entries by value, keeping first-appearance order.
fn group_counts<'a>(entries: impl Iterator<Item = &'a Value>) -> Vec<TagCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Value, u64)> = Vec::new();
    for entry in entries {
        let key = group_key(entry);
        if let Some(group) = positions
            .get(&key)
            .and_then(|position| groups.get_mut(*position))
        {
            group.1 += 1;
        } else {
            positions.insert(key, groups.len());
            groups.push((entry.clone(), 1));
        }
    }

    groups.sort_by(|left, right| right.1.cmp(&left.1));
    groups
        .into_iter()
        .map(|(tag, count)| TagCount::new(tag, count))
        .collect()
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    type Error = MemoryStoreError;

    async fn insert_one(
        &self,
        namespace: &CollectionNamespace,
        mut document: Document,
    ) -> Result<ObjectId, Self::Error> {
        document.remove(ID_FIELD);
        let id = self.ids.generate();
        let mut state = self.write()?;
        state
            .collections
            .entry(namespace.clone())
            .or_default()
            .push(StoredDocument { id, body: document });
        Ok(id)
    }

    async fn find_one(
        &self,
        namespace: &CollectionNamespace,
        id: ObjectId,
    ) -> Result<Option<Document>, Self::Error> {
        let state = self.read()?;
        let found = state
            .collections
            .get(namespace)
            .and_then(|documents| documents.iter().find(|stored| stored.id == id))
            .map(|stored| stored.body.clone());
        Ok(found)
    }

    async fn delete_one(
        &self,
        namespace: &CollectionNamespace,
        id: ObjectId,
    ) -> Result<u64, Self::Error> {
        let mut state = self.write()?;
        let Some(documents) = state.collections.get_mut(namespace) else {
            return Ok(0);
        };
        let Some(position) = documents.iter().position(|stored| stored.id == id) else {
            return Ok(0);
        };
        documents.remove(position);
        Ok(1)
    }

    async fn count_unwound(
        &self,
        namespace: &CollectionNamespace,
        field: &str,
    ) -> Result<Vec<TagCount>, Self::Error> {
        let state = self.read()?;
        let Some(documents) = state.collections.get(namespace) else {
            return Ok(Vec::new());
        };
        let entries = documents
            .iter()
            .flat_map(|stored| unwind(stored.body.get(field)));
        Ok(group_counts(entries))
    }
}
