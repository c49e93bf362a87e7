//! Error types for kube-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from kube-core
    #[error(transparent)]
    Core(#[from] kube_core::Error),

    /// Error from kube-meta
    #[error(transparent)]
    Meta(#[from] kube_meta::Error),

    /// Error from kube-fs
    #[error(transparent)]
    Fs(#[from] kube_fs::Error),

    /// Error from kube-git
    #[error(transparent)]
    Git(#[from] kube_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Output serialization error
    #[error("Failed to render YAML output: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Output serialization error
    #[error("Failed to render JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
