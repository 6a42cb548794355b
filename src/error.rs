//! Error types for the Lucerna library.
//!
//! Every fallible operation returns [`LucernaError`]. Validation problems are
//! reported before a request leaves the process, so callers can tell apart a
//! malformed document or command ([`LucernaError::InvalidArgument`],
//! [`LucernaError::Runtime`], [`LucernaError::OutOfBounds`]) from a failure
//! reported by Solr itself ([`LucernaError::Http`]).
//!
//! # Examples
//!
//! ```
//! use lucerna::error::{LucernaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LucernaError::invalid_argument("unknown modifier"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::convert::Infallible;
use std::io;

use thiserror::Error;

/// The main error type for Lucerna operations.
#[derive(Error, Debug)]
pub enum LucernaError {
    /// I/O errors (config files, document files, network streams)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An argument was outside the set of accepted values
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An object was used in a state that does not allow the operation
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A key lookup (component, command, endpoint) found nothing
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// A value had a different shape than expected
    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),

    /// Payload encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Solr answered with a non-success HTTP status
    #[error("HTTP error {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status message or error body returned by Solr.
        message: String,
    },

    /// The HTTP transport failed before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// XML response decoding errors
    #[error("XML error: {0}")]
    Xml(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with LucernaError.
pub type Result<T> = std::result::Result<T, LucernaError>;

impl LucernaError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LucernaError::InvalidArgument(msg.into())
    }

    /// Create a new runtime (state) error.
    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        LucernaError::Runtime(msg.into())
    }

    /// Create a new out of bounds error.
    pub fn out_of_bounds<S: Into<String>>(msg: S) -> Self {
        LucernaError::OutOfBounds(msg.into())
    }

    /// Create a new unexpected value error.
    pub fn unexpected_value<S: Into<String>>(msg: S) -> Self {
        LucernaError::UnexpectedValue(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        LucernaError::Serialization(msg.into())
    }

    /// Create a new HTTP error.
    pub fn http<S: Into<String>>(status: u16, msg: S) -> Self {
        LucernaError::Http {
            status,
            message: msg.into(),
        }
    }

    /// Create a new transport error.
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        LucernaError::Transport(msg.into())
    }

    /// Create a new XML error.
    pub fn xml<S: Into<String>>(msg: S) -> Self {
        LucernaError::Xml(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LucernaError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LucernaError::Other(msg.into())
    }

    /// Whether this error was raised locally while validating input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LucernaError::InvalidArgument(_)
                | LucernaError::Runtime(_)
                | LucernaError::OutOfBounds(_)
        )
    }
}

impl From<Infallible> for LucernaError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = LucernaError::invalid_argument("bad modifier");
        assert_eq!(error.to_string(), "Invalid argument: bad modifier");

        let error = LucernaError::runtime("missing key");
        assert_eq!(error.to_string(), "Runtime error: missing key");

        let error = LucernaError::http(404, "Not Found");
        assert_eq!(error.to_string(), "HTTP error 404: Not Found");
    }

    #[test]
    fn test_validation_kinds() {
        assert!(LucernaError::out_of_bounds("stats").is_validation());
        assert!(!LucernaError::http(500, "boom").is_validation());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = LucernaError::from(io_error);

        match error {
            LucernaError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
