//! Error types for kube-core

use std::path::PathBuf;

/// Result type for kube-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration or building the
/// reverse index.
///
/// Every variant names the file, key or customer involved so the offending
/// override can be found without re-deriving the merge order.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two files of the same layer define the same top-level key under the
    /// `reject` policy
    #[error("Conflicting key '{key}' in {file}: already defined by another file of the same layer")]
    Conflict { file: PathBuf, key: String },

    /// An `append` policy met a value that is not a mapping
    #[error("Cannot append key '{key}' from {file}: both values must be mappings")]
    TypeMismatch { file: PathBuf, key: String },

    /// Malformed merge configuration
    #[error("Invalid merge configuration at {path}: {message}")]
    MergeConfig { path: PathBuf, message: String },

    /// A source document parsed, but is not a mapping
    #[error("Invalid document at {path}: {message}")]
    InvalidDocument { path: PathBuf, message: String },

    /// The cluster definition holds a non-mapping block for a service
    #[error("Cluster '{cluster}' defines data for service '{service}' that is not a mapping")]
    InvalidClusterData { cluster: String, service: String },

    /// The customer/region has override directories in more than one place
    #[error(
        "Service '{service}' defines overrides for region '{region}' in more than one place: {}",
        .locations.join(", ")
    )]
    AmbiguousOverride {
        service: String,
        region: String,
        locations: Vec<String>,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from kube-fs (includes document parse failures)
    #[error(transparent)]
    Fs(#[from] kube_fs::Error),

    /// Metadata error from kube-meta
    #[error(transparent)]
    Meta(#[from] kube_meta::Error),
}
