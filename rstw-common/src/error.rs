//! Common error types for Restwell

use thiserror::Error;

/// Common result type for Restwell operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Restwell crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document store failure (unreadable or malformed persisted state)
    #[error("Storage error: {0}")]
    Storage(String),
}
