// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring the dataset into memory.
///
/// The store keeps the outcome of its single load attempt, so this type is
/// `Clone`: every caller after a failed load receives the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The dataset file does not exist.
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// The dataset exists but could not be read.
    #[error("cannot read dataset {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
    /// The dataset was read but is not in the expected tabular shape.
    #[error("malformed dataset {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Caller-recoverable query failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Anything an engine operation can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl EngineError {
    /// True when the caller sent something unusable, as opposed to the engine
    /// being unable to serve at all.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, EngineError::Query(_))
    }
}
