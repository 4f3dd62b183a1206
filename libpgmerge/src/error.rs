//! Error handling for libpgmerge.
use std::fmt;

/// A custom error type to represent various errors in libpgmerge.
#[derive(Debug)]
pub enum MergeError {
    /// An IO error occurred.
    IoError(std::io::Error),

    /// The merge list contained no file sets.
    EmptyInput,

    /// An invalid merge depth was requested.
    InvalidDepth(String),

    /// An invalid chunk count was requested.
    InvalidChunks(String),

    /// The external merge tool failed.
    PlinkError(String),

    /// Error when setting the number of threads
    ThreadError(String),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::IoError(err) => write!(f, "IO error: {}", err),
            MergeError::EmptyInput => write!(f, "No file sets to merge"),
            MergeError::InvalidDepth(msg) => write!(f, "Invalid merge depth: {}", msg),
            MergeError::InvalidChunks(msg) => write!(f, "Invalid chunk count: {}", msg),
            MergeError::PlinkError(msg) => write!(f, "Merge tool error: {}", msg),
            MergeError::ThreadError(msg) => write!(f, "Error relating to threads: {}", msg),
        }
    }
}

impl std::error::Error for MergeError {}

/// Converts a `std::io::Error` into a [`MergeError`].
impl From<std::io::Error> for MergeError {
    fn from(error: std::io::Error) -> Self {
        MergeError::IoError(error)
    }
}
