//! Task repository over an injected document store.

use super::TaskRepositoryConfig;
use crate::task::{
    domain::{
        CollectionNamespace, DeleteOutcome, Document, ID_FIELD, ObjectId, TAGS_FIELD, TagCount,
    },
    ports::{DocumentStore, StoreResult},
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Create, read, delete and tag aggregation for task documents.
///
/// Identifiers cross this boundary only as strings. A string that does not
/// parse as an [`ObjectId`] is treated as matching nothing, and the store is
/// not consulted. Store failures are returned exactly as the store reported
/// them.
pub struct TaskRepository<S>
where
    S: DocumentStore,
{
    store: Arc<S>,
    namespace: CollectionNamespace,
}

impl<S> Clone for TaskRepository<S>
where
    S: DocumentStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            namespace: self.namespace.clone(),
        }
    }
}

impl<S> std::fmt::Debug for TaskRepository<S>
where
    S: DocumentStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRepository")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl<S> TaskRepository<S>
where
    S: DocumentStore,
{
    /// Creates a repository addressing the configured collection of `store`.
    #[must_use]
    pub fn new(store: Arc<S>, config: &TaskRepositoryConfig) -> Self {
        Self {
            store,
            namespace: config.namespace(),
        }
    }

    /// Creates a repository over the default `task_service.tasks` collection.
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, &TaskRepositoryConfig::default())
    }

    /// Returns the collection this repository addresses.
    #[must_use]
    pub const fn namespace(&self) -> &CollectionNamespace {
        &self.namespace
    }

    /// Stores `data` as a new task and returns its assigned identifier.
    ///
    /// Any `_id` field in `data` is discarded; identifiers are always
    /// assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged when insertion fails.
    pub async fn create(&self, mut data: Document) -> StoreResult<String, S> {
        if data.remove(ID_FIELD).is_some() {
            trace!(namespace = %self.namespace, "discarding caller-supplied identifier");
        }
        let id = self.store.insert_one(&self.namespace, data).await?;
        debug!(namespace = %self.namespace, task_id = %id, "created task");
        Ok(id.to_hex())
    }

    /// Returns the task stored under `id` with `_id` set to `id`'s
    /// canonical string form.
    ///
    /// Returns `Ok(None)` when `id` is malformed or matches no task.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged when the lookup fails.
    pub async fn get(&self, id: &str) -> StoreResult<Option<Document>, S> {
        let Some(object_id) = parse_task_id(id) else {
            return Ok(None);
        };
        let found = self.store.find_one(&self.namespace, object_id).await?;
        Ok(found.map(|document| document.with_id(object_id.to_hex())))
    }

    /// Deletes the task stored under `id`.
    ///
    /// Returns `true` only when a task was removed. A malformed `id` and an
    /// unknown `id` both yield `false`; use [`Self::delete_with_outcome`] to
    /// tell them apart.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged when the removal fails.
    pub async fn delete(&self, id: &str) -> StoreResult<bool, S> {
        Ok(self.delete_with_outcome(id).await?.is_deleted())
    }

    /// Deletes the task stored under `id`, reporting why nothing was removed.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged when the removal fails.
    pub async fn delete_with_outcome(&self, id: &str) -> StoreResult<DeleteOutcome, S> {
        let outcome = match parse_task_id(id) {
            None => DeleteOutcome::InvalidIdentifier,
            Some(object_id) => match self.store.delete_one(&self.namespace, object_id).await? {
                1 => DeleteOutcome::Deleted,
                _ => DeleteOutcome::NotFound,
            },
        };
        debug!(
            namespace = %self.namespace,
            task_id = id,
            outcome = outcome.as_str(),
            "delete task"
        );
        Ok(outcome)
    }

    /// Counts tag occurrences across all tasks, most frequent first.
    ///
    /// Each entry of a task's `tags` field counts once, so a tag repeated
    /// within one task counts once per repetition. Tasks without tags
    /// contribute nothing. Order among equal counts is unspecified.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged when aggregation fails.
    pub async fn aggregate_by_tags(&self) -> StoreResult<Vec<TagCount>, S> {
        let counts = self.store.count_unwound(&self.namespace, TAGS_FIELD).await?;
        debug!(namespace = %self.namespace, groups = counts.len(), "aggregated tags");
        Ok(counts)
    }
}

fn parse_task_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id)
        .inspect_err(|err| {
            debug!(task_id = id, error = %err, "ignoring malformed task identifier");
        })
        .ok()
}
