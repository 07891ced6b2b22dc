//! Diesel row models for document persistence.

use super::schema::documents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for stored documents.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    /// Raw identifier bytes.
    pub id: Vec<u8>,
    /// Document body, parsed in stored field order.
    pub body: Value,
}

/// Insert model for stored documents.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub struct NewDocumentRow<'a> {
    /// Logical database name.
    pub database_name: &'a str,
    /// Collection name.
    pub collection_name: &'a str,
    /// Raw identifier bytes.
    pub id: Vec<u8>,
    /// Document body.
    pub body: Value,
    /// Insertion timestamp.
    pub inserted_at: DateTime<Utc>,
}

/// Row produced by the tag aggregation query.
#[derive(Debug, Clone, QueryableByName)]
pub struct UnwoundCountRow {
    /// Grouped value.
    #[diesel(sql_type = diesel::sql_types::Jsonb)]
    pub tag: Value,
    /// Number of unwound entries in the group.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}
