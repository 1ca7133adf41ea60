//! Error types for character operations.
//!
//! Uses thiserror for ergonomic error definition. Note that not every miss is
//! an error: the update/experience/progression paths return `Ok(None)` for
//! absent records instead of raising. That split is part of the operation
//! contracts and is deliberately left un-unified.

use crate::store::StoreError;

/// Errors surfaced by the character service.
#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    /// A required input was missing or empty. Caller-fixable; never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced character does not exist.
    #[error("Character not found: {0}")]
    NotFound(String),

    /// The player owns no characters. Distinct from an empty list by
    /// contract.
    #[error("No characters found for player: {0}")]
    NoCharactersForPlayer(String),

    /// The backing store failed. Propagates uncaught; fatal to the current
    /// request.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for character operations.
pub type Result<T> = std::result::Result<T, CharacterError>;
