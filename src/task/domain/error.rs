//! Error types for task domain values.

use thiserror::Error;

/// Errors returned while parsing an [`ObjectId`](super::ObjectId) from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ObjectIdError {
    /// The input does not contain exactly 24 characters.
    #[error("invalid object identifier length {0}, expected 24 hexadecimal digits")]
    InvalidLength(usize),

    /// The input contains a character outside `[0-9a-fA-F]`.
    #[error("invalid character {character:?} at position {position} in object identifier")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character position.
        position: usize,
    },
}

/// Errors returned while constructing documents from arbitrary JSON.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The value is not a JSON object.
    #[error("document body must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}
