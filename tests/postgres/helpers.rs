//! Shared helpers for `PostgreSQL` document store tests.
//!
//! Tests run against the database named by
//! `TASK_SERVICE_TEST_DATABASE_URL` and are skipped when it is unset. Each
//! test addresses its own logical database name, so tests never observe
//! each other's documents.

use std::sync::{Arc, Mutex, OnceLock};

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use rstest::fixture;
use task_service::task::{
    adapters::postgres::{DocumentPgPool, PostgresDocumentStore},
    services::{TaskRepository, TaskRepositoryConfig},
};
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the test database.
pub const DATABASE_URL_ENV: &str = "TASK_SERVICE_TEST_DATABASE_URL";

/// SQL creating the document table.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-15-000000_create_documents/up.sql");

/// SQL switching document bodies to order-preserving `JSON`.
pub const PRESERVE_FIELD_ORDER_SQL: &str =
    include_str!("../../migrations/2026-10-16-000000_preserve_document_field_order/up.sql");

static SCHEMA_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

#[derive(QueryableByName)]
struct Presence {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    present: bool,
}

fn query_presence(connection: &mut PgConnection, sql: &str) -> Result<bool, BoxError> {
    Ok(diesel::sql_query(sql)
        .get_result::<Presence>(connection)?
        .present)
}

/// Repository type used by `PostgreSQL` tests.
pub type PostgresRepository = TaskRepository<PostgresDocumentStore>;

/// Applies whichever migrations the test database still lacks.
fn ensure_schema(pool: &DocumentPgPool) -> Result<(), BoxError> {
    let lock = SCHEMA_LOCK.get_or_init(|| Mutex::new(()));
    let _guard = lock
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let mut connection = pool.get()?;
    let table_present = query_presence(
        &mut connection,
        "SELECT to_regclass('public.documents') IS NOT NULL AS present",
    )?;
    if !table_present {
        connection.batch_execute(CREATE_SCHEMA_SQL)?;
    }
    let body_is_jsonb = query_presence(
        &mut connection,
        concat!(
            "SELECT EXISTS (SELECT 1 FROM information_schema.columns ",
            "WHERE table_schema = 'public' AND table_name = 'documents' ",
            "AND column_name = 'body' AND data_type = 'jsonb') AS present",
        ),
    )?;
    if body_is_jsonb {
        connection.batch_execute(PRESERVE_FIELD_ORDER_SQL)?;
    }
    Ok(())
}

/// Provides a repository over a fresh logical database, or `None` when no
/// test database is configured.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or the schema cannot be
/// applied.
#[fixture]
pub fn postgres_repository() -> Result<Option<PostgresRepository>, BoxError> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder().max_size(2).build(manager)?;
    ensure_schema(&pool)?;

    let config =
        TaskRepositoryConfig::default().with_database_name(format!("test_{}", Uuid::new_v4()));
    Ok(Some(TaskRepository::new(
        Arc::new(PostgresDocumentStore::new(pool)),
        &config,
    )))
}
