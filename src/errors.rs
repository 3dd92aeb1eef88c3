/*!
 * Error types for the yantai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The backing service cannot be reached (connection refused, DNS, timeout)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Whether this error means the service could not be reached at all,
    /// as opposed to the service answering with a fault
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors raised by the chunk segmenter for invalid configuration
#[derive(Error, Debug)]
pub enum SegmentationError {
    /// Chunk size must be non-zero
    #[error("Invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap must satisfy 0 < overlap < chunk_size
    #[error("Invalid overlap {overlap} for chunk size {chunk_size} (must satisfy 0 < overlap < chunk_size)")]
    InvalidOverlap {
        /// Configured chunk size
        chunk_size: usize,
        /// Configured overlap width
        overlap: usize,
    },
}

/// Errors that can occur in the per-novel session store
#[derive(Error, Debug)]
pub enum SessionError {
    /// Error from a file operation on session state
    #[error("Session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file exists but does not parse
    #[error("Malformed session file {path}: {source}")]
    Malformed {
        /// Path of the offending file
        path: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Session state failed to serialize for write-back
    #[error("Could not serialize session state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No usable directory for the default session root
    #[error("Could not determine a data directory for session state")]
    NoDataDir,
}

/// Errors that abort one chapter (the batch continues with the next one)
#[derive(Error, Debug)]
pub enum ChapterError {
    /// Error reading the chapter file
    #[error("Could not read chapter file {path}: {source}")]
    Read {
        /// Path of the chapter file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from chunk segmentation
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the session store
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from chapter processing
    #[error("Chapter error: {0}")]
    Chapter(#[from] ChapterError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
