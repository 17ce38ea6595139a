//! Error types for Graph Store operations

use thiserror::Error;

/// Graph Store errors
#[derive(Debug, Error)]
pub enum GraphError {
    /// A read query against the store failed
    #[error("Graph query failed: {0}")]
    Query(String),

    /// A write (upsert or prune) against the store failed
    #[error("Graph write failed: {0}")]
    Write(String),
}

/// Result type for Graph Store operations
pub type Result<T> = std::result::Result<T, GraphError>;
