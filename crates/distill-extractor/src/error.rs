//! Error types for the extraction pipeline

use thiserror::Error;

/// Errors that can occur while processing a document
#[derive(Error, Debug)]
pub enum DistillError {
    /// An item violated a pipeline invariant (upstream classifier bug)
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// The chunk source emitted the same chunk id twice
    #[error("Duplicate chunk id: {0}")]
    DuplicateChunkId(String),

    /// Input bytes are not valid UTF-8 text
    #[error("Invalid text encoding: {0}")]
    InvalidEncoding(String),

    /// File type the loader cannot read
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// I/O error while loading a document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cue pattern failed to compile
    #[error("Invalid rule '{name}': {message}")]
    Rule {
        /// Cue name
        name: String,
        /// Compiler message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Result serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A batch worker failed outside the pipeline (panic or cancellation)
    #[error("Worker error: {0}")]
    Worker(String),
}

impl From<serde_json::Error> for DistillError {
    fn from(e: serde_json::Error) -> Self {
        DistillError::Serialization(e.to_string())
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, DistillError>;
