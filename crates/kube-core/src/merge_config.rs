//! Per-service policy for combining files of the same layer.
//!
//! A service may carry a `_merge.yaml` next to its templates:
//!
//! ```yaml
//! default: reject
//! paths:
//!   workers: append
//!   image: overwrite
//! ```

use indexmap::IndexMap;
use kube_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;

use crate::{Error, Result};

/// File name of the merge configuration inside a service directory.
pub const MERGE_CONFIG_FILE: &str = "_merge.yaml";

/// What to do when two files of one layer define the same top-level key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Fail with a conflict error
    #[default]
    Reject,
    /// The later file wins
    Overwrite,
    /// Shallow union of two mappings
    Append,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reject => "reject",
            Self::Overwrite => "overwrite",
            Self::Append => "append",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default)]
    pub default: Policy,
    #[serde(default)]
    pub paths: IndexMap<String, Policy>,
}

impl MergeConfig {
    /// A configuration that applies `policy` to every key.
    pub fn with_default(policy: Policy) -> Self {
        Self {
            default: policy,
            paths: IndexMap::new(),
        }
    }

    /// Parse a merge configuration document.
    ///
    /// `path` is only used to name the source in errors.
    pub fn from_value(value: Value, path: &NormalizedPath) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(|e| Error::MergeConfig {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    /// Load the merge configuration at `path`; a missing file yields the
    /// default (reject everything).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        match ConfigStore::new().load_optional_value(path)? {
            Some(value) => {
                let config = Self::from_value(value, path)?;
                tracing::debug!(%path, default = %config.default, keys = config.paths.len(), "Loaded merge configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load the merge configuration of the service rooted at `service_dir`.
    pub fn for_service(service_dir: &NormalizedPath) -> Result<Self> {
        Self::load(&service_dir.join(MERGE_CONFIG_FILE))
    }

    pub fn policy_for(&self, key: &str) -> Policy {
        self.paths.get(key).copied().unwrap_or(self.default)
    }
}
