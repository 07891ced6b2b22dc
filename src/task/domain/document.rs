//! Schema-less document bodies.

use super::DocumentError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the identifier of a returned document.
pub const ID_FIELD: &str = "_id";

/// Field unwound by tag aggregation.
pub const TAGS_FIELD: &str = "tags";

/// Ordered mapping from field names to JSON values.
///
/// Field order is preserved as supplied. The repository never inspects any
/// field other than [`ID_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the string identifier in [`ID_FIELD`], if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Consumes the document, returning it with [`ID_FIELD`] set to `id` as
    /// its first field.
    ///
    /// Any existing [`ID_FIELD`] entry is replaced.
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        let mut fields = Map::with_capacity(self.len() + 1);
        fields.insert(ID_FIELD.to_owned(), Value::String(id.into()));
        fields.extend(
            self.0
                .into_iter()
                .filter(|(key, _)| key.as_str() != ID_FIELD),
        );
        Self(fields)
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Self::Object(document.0)
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(DocumentError::NotAnObject(value_kind(&other))),
        }
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
