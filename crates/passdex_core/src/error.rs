//! Error types for the passdex store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required top-level directory is absent.
    ///
    /// This is a precondition failure: the phase that needed the directory
    /// aborts, but other phases are unaffected.
    #[error("required directory is missing: {path}")]
    MissingDirectory {
        /// The absent directory.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A segment file name does not carry a parseable sequence suffix.
    #[error("invalid segment file name: {name}")]
    InvalidSegmentName {
        /// The offending file name.
        name: String,
    },

    /// A stored line does not split into the five record fields.
    #[error("malformed record line: {line:?}")]
    MalformedRecord {
        /// The offending line.
        line: String,
    },

    /// A key with no leading character cannot be partitioned.
    #[error("empty key cannot be partitioned")]
    EmptyKey,
}

impl StoreError {
    /// Creates a missing-directory error.
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }

    /// Creates an invalid-segment-name error.
    pub fn invalid_segment_name(name: impl Into<String>) -> Self {
        Self::InvalidSegmentName { name: name.into() }
    }

    /// Creates a malformed-record error.
    pub fn malformed_record(line: impl Into<String>) -> Self {
        Self::MalformedRecord { line: line.into() }
    }
}
