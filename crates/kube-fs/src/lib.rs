//! Filesystem access for kubeconf
//!
//! Provides normalized paths, YAML/JSON document loading, sorted directory
//! listings, glob expansion and workspace-root discovery.

pub mod config;
pub mod error;
pub mod glob;
pub mod io;
pub mod path;
pub mod workspace;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use workspace::discover_root;
