//! Outcomes of identifier-addressed removals.

/// Result of deleting a document by its string identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Exactly one document was removed.
    Deleted,
    /// The identifier was well formed but matched no document.
    NotFound,
    /// The identifier could not be parsed; the store was not consulted.
    InvalidIdentifier,
}

impl DeleteOutcome {
    /// Returns `true` only for [`DeleteOutcome::Deleted`].
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Returns the canonical label used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::NotFound => "not_found",
            Self::InvalidIdentifier => "invalid_identifier",
        }
    }
}
