//! Diesel schema for document persistence.

diesel::table! {
    /// Schema-less documents addressed by database, collection and identifier.
    documents (database_name, collection_name, id) {
        /// Logical database name.
        #[max_length = 255]
        database_name -> Varchar,
        /// Collection name within the logical database.
        #[max_length = 255]
        collection_name -> Varchar,
        /// Twelve-byte object identifier.
        id -> Bytea,
        /// Document body without the identifier field, with field order kept.
        body -> Json,
        /// Insertion timestamp.
        inserted_at -> Timestamptz,
    }
}
