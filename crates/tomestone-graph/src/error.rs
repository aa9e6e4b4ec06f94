//! Error types for dependency graph operations.

use thiserror::Error;

/// Errors that can occur while resolving dependency information.
#[derive(Debug, Error)]
pub enum Error {
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A buffer was too short for the structure being read from it.
    #[error(transparent)]
    Binary(#[from] tomestone_common::Error),

    /// A path could not be parsed as a canonical root path.
    #[error("not a canonical root path: {0}")]
    NonCanonicalRoot(String),

    /// A collaborator reported a failure of its own.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Convenience result type for dependency graph operations.
pub type Result<T> = std::result::Result<T, Error>;
