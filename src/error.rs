//! Error types for humanlog.
//!
//! Nothing in the public logging surface returns these errors. They exist so
//! that the internal write path can use `?`, and the tracker decides in one
//! place what to do with a failed write (log it and keep going).

use thiserror::Error;

/// Errors raised while writing log lines.
#[derive(Debug, Error)]
pub enum HumanLogError {
    /// Writing or flushing an output stream failed.
    #[error("failed to write to {stream}: {source}")]
    Write {
        stream: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl HumanLogError {
    /// Wrap an IO error with the name of the stream it happened on.
    pub fn write(stream: &'static str, source: std::io::Error) -> Self {
        Self::Write { stream, source }
    }
}

/// Result type alias for humanlog operations.
pub type Result<T> = std::result::Result<T, HumanLogError>;
