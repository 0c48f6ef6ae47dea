//! Protocol error types

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Response body exceeds maximum size
    #[error("Response too large: {size} bytes exceeds maximum of {max} bytes")]
    ResponseTooLarge { size: usize, max: usize },

    /// Response body was not valid UTF-8
    #[error("Response is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Command cannot be put on the wire
    #[error("Invalid command argument: {0:?}")]
    InvalidArgument(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
