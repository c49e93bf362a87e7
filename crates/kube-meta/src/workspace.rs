//! A workspace: its root directory plus its parsed configuration.

use kube_fs::NormalizedPath;

use crate::cluster::{Cluster, cluster_names};
use crate::config::{SiloRegion, WorkspaceConfig};
use crate::error::Result;

/// File name of a materialized service manifest.
const MATERIALIZED_FILE: &str = "deployment.yaml";

#[derive(Debug, Clone)]
pub struct Workspace {
    root: NormalizedPath,
    config: WorkspaceConfig,
}

impl Workspace {
    pub fn new(root: NormalizedPath, config: WorkspaceConfig) -> Self {
        Self { root, config }
    }

    /// Open the workspace at `root`, reading the configuration from
    /// `config_path` or from its default location.
    pub fn open(root: NormalizedPath, config_path: Option<NormalizedPath>) -> Result<Self> {
        let config = match config_path {
            Some(path) => WorkspaceConfig::load(&path)?,
            None => WorkspaceConfig::load_from_root(&root)?,
        };
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Resolve a customer name or alias.
    pub fn region(&self, customer: &str) -> Result<(&str, &SiloRegion)> {
        self.config.region(customer)
    }

    /// Cluster definition directory of `customer`, relative to the root.
    pub fn cluster_def_dir(&self, customer: &str) -> Result<NormalizedPath> {
        let (_, region) = self.region(customer)?;
        Ok(region.k8s.cluster_def_dir())
    }

    /// Every cluster of `customer`.
    ///
    /// A single-cluster customer yields just its configured cluster;
    /// otherwise every definition file in the cluster directory is loaded.
    pub fn clusters(&self, customer: &str) -> Result<Vec<Cluster>> {
        let (name, region) = self.region(customer)?;
        let dir = self.root.join(region.k8s.cluster_def_dir().as_str());

        if let Some(only) = &region.k8s.cluster_name {
            return Ok(vec![Cluster::load(name, &dir, only)?]);
        }

        cluster_names(&dir)?
            .iter()
            .map(|cluster| Cluster::load(name, &dir, cluster))
            .collect()
    }

    /// Load one cluster definition of `customer`.
    ///
    /// A single-cluster customer always loads its configured cluster,
    /// whatever name is asked for.
    pub fn cluster(&self, customer: &str, cluster: &str) -> Result<Cluster> {
        let (name, region) = self.region(customer)?;
        let dir = self.root.join(region.k8s.cluster_def_dir().as_str());
        let cluster = region.k8s.cluster_name.as_deref().unwrap_or(cluster);
        Cluster::load(name, &dir, cluster)
    }

    /// Where the rendered manifest of one service is stored.
    pub fn materialized_path(&self, customer: &str, cluster: &str, service: &str) -> Result<NormalizedPath> {
        let (_, region) = self.region(customer)?;
        Ok(self
            .root
            .join(&region.k8s.root)
            .join(&region.k8s.materialized_manifests)
            .join(cluster)
            .join(service)
            .join(MATERIALIZED_FILE))
    }
}
