//! Error types for menagerie-core

use thiserror::Error;

/// Core error type
///
/// Every variant is reported synchronously to the caller of `dispatch`; the
/// store's current state is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value handed to the store is not a usable action record
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// `dispatch` was called while another dispatch on the same store was running
    #[error("Dispatch in progress: reducers and listeners may not dispatch")]
    ReentrantDispatch,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
