//! Error types for kube-git

use std::path::PathBuf;

/// Result type for kube-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading git history
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {path}")]
    NotARepository { path: PathBuf },

    #[error("Revision '{rev}' not found: {message}")]
    RevisionNotFound { rev: String, message: String },
}
