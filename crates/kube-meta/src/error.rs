//! Error types for kube-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] kube_fs::Error),

    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Region '{name}' not found. Did you mean one of: {known}")]
    RegionNotFound { name: String, known: String },

    #[error("Cluster '{cluster}' of customer '{customer}' not found at {path}")]
    ClusterNotFound {
        customer: String,
        cluster: String,
        path: PathBuf,
    },

    #[error("Service named {name} was not found in the {namespace} namespace")]
    ServiceNotFound { name: String, namespace: String },

    #[error("Found duplicate service: {path}")]
    DuplicateService { name: String, path: PathBuf },

    #[error("Invalid service path: {pattern}")]
    InvalidServicePath { pattern: String },
}
