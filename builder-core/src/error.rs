//! Error types for builder operations.

use thiserror::Error;

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur while manipulating the component tree.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Component not found in the layout store. Indicates an
    /// order-of-operations bug in a collaborator, so it is surfaced
    /// rather than swallowed.
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// Invalid operation on a component.
    #[error("Invalid operation on component: {0}")]
    InvalidOperation(String),

    /// App definition serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
