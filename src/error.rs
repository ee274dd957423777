// src/error.rs

//! Error types for abbs-dep
//!
//! Only failures that abort a run live here. A package missing from the
//! store or a dependency without a satisfying version are recorded as node
//! flags, and dependency loops are part of the computed result.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for abbs-dep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort dependency resolution
#[derive(Error, Debug)]
pub enum Error {
    /// Query or connection failure in the backing store
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database file does not exist
    #[error("database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    /// IO error while touching the database file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A version string could not be parsed
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A version relation operator is not recognised
    #[error("unknown version relation: '{0}'")]
    InvalidRelation(String),
}

impl Error {
    pub(crate) fn invalid_version(version: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}
