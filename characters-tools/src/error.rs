//! Error types for tool dispatch and execution.

use characters_core::CharacterError;

/// Errors surfaced to tool callers.
///
/// `Validation` and `NotFound` mirror the service taxonomy; everything the
/// caller cannot fix (store failures, serialization) collapses into
/// `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The params payload did not match the tool's input schema.
    #[error("Invalid parameters for {tool}: {reason}")]
    InvalidParameters { tool: String, reason: String },

    /// A required input was missing or empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation failed below the tool layer.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CharacterError> for ToolError {
    fn from(err: CharacterError) -> Self {
        match err {
            CharacterError::Validation(message) => ToolError::Validation(message),
            CharacterError::Store(inner) => ToolError::Internal(inner.to_string()),
            // NotFound and NoCharactersForPlayer both surface as misses, with
            // the service's own message intact.
            other => ToolError::NotFound(other.to_string()),
        }
    }
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
