//! Error types for network record reconstruction

use thiserror::Error;

/// Errors raised while rebuilding network records from a DevTools log
#[derive(Error, Debug)]
pub enum RecordParsingError {
    /// The log itself is not valid JSON or not an array of events
    #[error("Malformed DevTools log: {0}")]
    MalformedLog(#[from] serde_json::Error),

    /// An event's parameters do not have the shape its method requires
    #[error("Invalid {method} event at index {index}: {source}")]
    InvalidEvent {
        method: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for record parsing
pub type Result<T> = std::result::Result<T, RecordParsingError>;
