//! Error types for the udf2docx library.
//!
//! Only *fatal* conditions are errors here: a bad input root, a walk that
//! cannot even start, an invalid configuration. A single file that every
//! strategy failed on is **not** an error. It is recorded as a failed
//! [`crate::output::Outcome`] inside the [`crate::output::BatchReport`] and
//! the batch moves on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the udf2docx library.
#[derive(Debug, Error)]
pub enum UdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input root does not exist.
    #[error("Input directory not found: '{path}'")]
    RootNotFound { path: PathBuf },

    /// The input root exists but is a file, socket, etc.
    #[error("Input path is not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// Directory traversal failed at the root itself.
    #[error("Failed to walk '{path}': {detail}")]
    Discovery { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
