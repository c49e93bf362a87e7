//! Workspace configuration
//!
//! The workspace configuration file (`cli_config/configuration.yaml` by
//! default) lists every customer ("silo region") and where its Kubernetes
//! configuration lives:
//!
//! ```yaml
//! silo_regions:
//!   saas:
//!     aliases: [us]
//!     k8s:
//!       root: k8s
//!       cluster_def_root: clusters/saas
//!       materialized_manifests: materialized_manifests/saas
//! ```

use indexmap::IndexMap;
use kube_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default location of the workspace configuration, relative to the root.
pub const DEFAULT_CONFIG_PATH: &str = "cli_config/configuration.yaml";

/// Where the Kubernetes configuration of one customer lives.
///
/// A configuration either names a single cluster (single-tenant customers)
/// or points at a directory holding one definition file per cluster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct K8sConfig {
    /// Root of the Kubernetes configuration, relative to the workspace root
    pub root: String,
    /// Directory of cluster definition files, relative to `root`
    pub cluster_def_root: String,
    /// Set when the customer has exactly one cluster
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Directory of rendered manifests, relative to `root`
    pub materialized_manifests: String,
}

impl K8sConfig {
    /// Cluster definition directory, relative to the workspace root.
    pub fn cluster_def_dir(&self) -> NormalizedPath {
        NormalizedPath::new(&self.root).join(&self.cluster_def_root)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SiloRegion {
    pub k8s: K8sConfig,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Parsed workspace configuration. Customers keep file order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkspaceConfig {
    pub silo_regions: IndexMap<String, SiloRegion>,
}

impl WorkspaceConfig {
    /// Load the configuration at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        let config: Self = ConfigStore::new().load(path)?;
        if config.silo_regions.is_empty() {
            return Err(Error::InvalidConfig {
                path: path.to_native(),
                message: "silo_regions entry is empty".into(),
            });
        }
        tracing::debug!(%path, customers = config.silo_regions.len(), "Loaded workspace configuration");
        Ok(config)
    }

    /// Load the configuration from its default location under `root`.
    pub fn load_from_root(root: &NormalizedPath) -> Result<Self> {
        Self::load(&root.join(DEFAULT_CONFIG_PATH))
    }

    /// Customer names in configuration order.
    pub fn customers(&self) -> impl Iterator<Item = &str> {
        self.silo_regions.keys().map(String::as_str)
    }

    /// Look up a customer by name or alias.
    ///
    /// Returns the canonical customer name with its configuration.
    pub fn region(&self, name: &str) -> Result<(&str, &SiloRegion)> {
        if let Some((key, region)) = self.silo_regions.get_key_value(name) {
            return Ok((key.as_str(), region));
        }
        self.silo_regions
            .iter()
            .find(|(_, region)| region.aliases.iter().any(|a| a == name))
            .map(|(key, region)| (key.as_str(), region))
            .ok_or_else(|| Error::RegionNotFound {
                name: name.to_string(),
                known: self.customers().collect::<Vec<_>>().join(", "),
            })
    }
}
