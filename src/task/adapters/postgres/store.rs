//! `PostgreSQL` document store backed by a `JSON` table.

use super::{
    models::{DocumentRow, NewDocumentRow, UnwoundCountRow},
    schema::documents,
};
use crate::task::{
    domain::{CollectionNamespace, Document, ID_FIELD, ObjectId, ObjectIdGenerator, TagCount},
    ports::DocumentStore,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use mockable::Clock;
use serde_json::Value;
use std::fmt;
use std::num::TryFromIntError;
use std::sync::Arc;
use thiserror::Error;

/// `PostgreSQL` connection pool type used by the document store.
pub type DocumentPgPool = Pool<ConnectionManager<PgConnection>>;

/// Unwinds one field per document, treating a scalar as a one-element
/// array, then counts entries per distinct value.
///
/// Bodies are stored as `JSON` and cast to `JSONB` here so that grouping
/// compares values rather than their text.
const COUNT_UNWOUND_SQL: &str = concat!(
    "SELECT entry.tag, COUNT(*) AS count ",
    "FROM documents AS d ",
    "CROSS JOIN LATERAL (SELECT (d.body::jsonb) -> $3 AS value) AS field ",
    "CROSS JOIN LATERAL jsonb_array_elements(",
    "CASE jsonb_typeof(field.value) ",
    "WHEN 'array' THEN field.value ",
    "ELSE jsonb_build_array(field.value) END",
    ") AS entry(tag) ",
    "WHERE d.database_name = $1 ",
    "AND d.collection_name = $2 ",
    "AND jsonb_typeof(field.value) IS NOT NULL ",
    "AND jsonb_typeof(field.value) <> 'null' ",
    "GROUP BY entry.tag ",
    "ORDER BY count DESC",
);

/// Errors returned by [`PostgresDocumentStore`].
#[derive(Debug, Error)]
pub enum PostgresStoreError {
    /// No pooled connection could be obtained.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// A query failed.
    #[error("query error: {0}")]
    Query(#[from] diesel::result::Error),

    /// The blocking database task did not complete.
    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A stored identifier does not have twelve bytes.
    #[error("stored identifier has {0} bytes, expected 12")]
    CorruptIdentifier(usize),

    /// A stored body is not a JSON object.
    #[error("stored document body is not a JSON object")]
    CorruptDocument,

    /// A row count reported by the database does not fit in `u64`.
    #[error("row count out of range: {0}")]
    CountOutOfRange(#[from] TryFromIntError),
}

/// Result type for [`PostgresDocumentStore`] operations.
pub type PostgresStoreResult<T> = Result<T, PostgresStoreError>;

/// `PostgreSQL`-backed document store.
///
/// Identifiers are assigned client-side before insertion.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: DocumentPgPool,
    ids: Arc<ObjectIdGenerator>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl PostgresDocumentStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub fn new(pool: DocumentPgPool) -> Self {
        Self::with_clock(pool, Arc::new(mockable::DefaultClock))
    }

    /// Creates a store stamping identifiers and insertion times from `clock`.
    #[must_use]
    pub fn with_clock(pool: DocumentPgPool, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            pool,
            ids: Arc::new(ObjectIdGenerator::with_clock(Arc::clone(&clock))),
            clock,
        }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PostgresStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PostgresStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            f(&mut connection)
        })
        .await?
    }
}

impl fmt::Debug for PostgresDocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDocumentStore")
            .field("pool", &self.pool)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    type Error = PostgresStoreError;

    async fn insert_one(
        &self,
        namespace: &CollectionNamespace,
        mut document: Document,
    ) -> PostgresStoreResult<ObjectId> {
        document.remove(ID_FIELD);
        let id = self.ids.generate();
        let inserted_at = self.clock.utc();
        let database = namespace.database().to_owned();
        let collection = namespace.collection().to_owned();

        self.run_blocking(move |connection| {
            let row = NewDocumentRow {
                database_name: database.as_str(),
                collection_name: collection.as_str(),
                id: id.bytes().to_vec(),
                body: Value::from(document),
                inserted_at,
            };
            diesel::insert_into(documents::table)
                .values(&row)
                .execute(connection)?;
            Ok(id)
        })
        .await
    }

    async fn find_one(
        &self,
        namespace: &CollectionNamespace,
        id: ObjectId,
    ) -> PostgresStoreResult<Option<Document>> {
        let database = namespace.database().to_owned();
        let collection = namespace.collection().to_owned();

        self.run_blocking(move |connection| {
            let row = documents::table
                .filter(documents::database_name.eq(database.as_str()))
                .filter(documents::collection_name.eq(collection.as_str()))
                .filter(documents::id.eq(id.bytes().to_vec()))
                .select(DocumentRow::as_select())
                .first::<DocumentRow>(connection)
                .optional()?;
            row.map(row_to_document).transpose()
        })
        .await
    }

    async fn delete_one(
        &self,
        namespace: &CollectionNamespace,
        id: ObjectId,
    ) -> PostgresStoreResult<u64> {
        let database = namespace.database().to_owned();
        let collection = namespace.collection().to_owned();

        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                documents::table
                    .filter(documents::database_name.eq(database.as_str()))
                    .filter(documents::collection_name.eq(collection.as_str()))
                    .filter(documents::id.eq(id.bytes().to_vec())),
            )
            .execute(connection)?;
            Ok(u64::try_from(removed)?)
        })
        .await
    }

    async fn count_unwound(
        &self,
        namespace: &CollectionNamespace,
        field: &str,
    ) -> PostgresStoreResult<Vec<TagCount>> {
        let database = namespace.database().to_owned();
        let collection = namespace.collection().to_owned();
        let field_name = field.to_owned();

        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(COUNT_UNWOUND_SQL)
                .bind::<diesel::sql_types::Text, _>(database.as_str())
                .bind::<diesel::sql_types::Text, _>(collection.as_str())
                .bind::<diesel::sql_types::Text, _>(field_name.as_str())
                .load::<UnwoundCountRow>(connection)?;
            rows.into_iter()
                .map(|row| -> PostgresStoreResult<TagCount> {
                    Ok(TagCount::new(row.tag, u64::try_from(row.count)?))
                })
                .collect()
        })
        .await
    }
}

fn row_to_document(row: DocumentRow) -> PostgresStoreResult<Document> {
    let DocumentRow { id, body } = row;
    if id.len() != 12 {
        return Err(PostgresStoreError::CorruptIdentifier(id.len()));
    }
    Document::try_from(body).map_err(|_| PostgresStoreError::CorruptDocument)
}
