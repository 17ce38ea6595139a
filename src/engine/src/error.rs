//! Error types for the resolution engine

use thiserror::Error;

/// Resolution engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// A relationship definition is missing a required field
    #[error("Invalid relationship definition: {0}")]
    InvalidDefinition(String),

    /// The definitions document could not be parsed
    #[error("Definition document error: {0}")]
    Definitions(#[from] serde_yaml::Error),

    /// Graph Store read or write failure
    #[error("Graph store error: {0}")]
    Graph(#[from] nimbus_graph::GraphError),

    /// I/O error reading the definitions document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
