//! Error taxonomy for the object store and reference graph.
//!
//! Every fallible core operation returns [`UgitResult`]. Internal
//! programming-contract violations (a freshly-hashed OID failing to parse
//! as hex, for example) are bugs, not `UgitError` variants, and are
//! allowed to panic.

use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

pub type UgitResult<T> = Result<T, UgitError>;

#[derive(Debug, Error)]
pub enum UgitError {
    #[error("object {oid} not found")]
    NotFound { oid: String },

    #[error("object {oid} has type {actual:?}, expected {expected:?}")]
    BadType {
        oid: String,
        expected: &'static str,
        actual: String,
    },

    #[error("object {oid} is corrupt: {reason}")]
    Corrupt { oid: String, reason: String },

    #[error("bad ref {name}: {reason}")]
    BadRef { name: String, reason: String },

    #[error("bad commit object {oid}: {reason}")]
    BadCommit { oid: String, reason: String },

    #[error("bad tree object {oid}: {reason}")]
    BadTree { oid: String, reason: String },

    #[error("bad entry name {name:?}: {reason}")]
    BadName { name: String, reason: String },

    #[error("unknown name {name:?}")]
    UnknownName { name: String },

    #[error("ref {name} may not be set to an empty value")]
    EmptyValue { name: String },

    #[error("external tool {tool:?} exited unexpectedly (status {status:?})")]
    ToolError { tool: String, status: Option<i32> },

    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Wraps a filesystem error with the path it occurred on, the way every
/// other variant here carries the context needed to render a diagnostic.
pub fn io_err(path: &Path, source: std::io::Error) -> UgitError {
    UgitError::Io {
        path: path.to_path_buf(),
        source,
    }
}
