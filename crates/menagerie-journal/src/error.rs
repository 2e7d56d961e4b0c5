//! Error types for menagerie-journal

use thiserror::Error;

/// Journal error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid sequence range
    #[error("Invalid sequence range: {0}..={1}")]
    InvalidRange(u64, u64),

    /// Export error
    #[error("Export error: {0}")]
    ExportError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] menagerie_core::Error),
}

/// Result type for journal operations
pub type Result<T> = std::result::Result<T, Error>;
