//! Reverse index from filesystem paths to the units they render into.

use kube_fs::{NormalizedPath, io};
use kube_meta::{ServiceCatalog, ServiceNamespace, Workspace};
use std::collections::{BTreeMap, BTreeSet};

use super::reference::ResourceReference;
use super::trie::PathTrie;
use crate::Result;

/// Maps a changed path to the [`ResourceReference`]s it impacts.
///
/// Every cluster definition directory owns a whole-cluster reference for
/// each cluster of its customer, and every service directory owns a
/// reference per (customer, cluster) rendering it. A path owned by several
/// units keeps all of them.
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
    trie: PathTrie,
    resources: BTreeMap<NormalizedPath, BTreeSet<ResourceReference>>,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every customer, cluster and service of `workspace`.
    ///
    /// `namespace` selects native or helm services. A cluster that cannot
    /// be loaded fails the whole build.
    pub fn build(workspace: &Workspace, namespace: ServiceNamespace) -> Result<Self> {
        let root = io::canonicalize(workspace.root())?;
        let mut index = Self::new();
        for customer in workspace.config().customers() {
            index.absorb(Self::scan_customer(workspace, &root, customer, namespace)?);
        }
        tracing::info!(
            %namespace,
            paths = index.resources.len(),
            references = index.reference_count(),
            "Built resource index"
        );
        Ok(index)
    }

    /// Partial index of one customer.
    ///
    /// Customers are independent of one another, so partial indexes can be
    /// built separately and combined with [`ResourceIndex::absorb`].
    pub fn scan_customer(
        workspace: &Workspace,
        canonical_root: &NormalizedPath,
        customer: &str,
        namespace: ServiceNamespace,
    ) -> Result<Self> {
        let clusters = workspace.clusters(customer)?;
        let cluster_def_dir = workspace.cluster_def_dir(customer)?;
        let mut catalog = ServiceCatalog::new(workspace.root().clone());
        let mut index = Self::new();

        for cluster in &clusters {
            tracing::debug!(customer, cluster = %cluster.name, "Indexing cluster");
            index.insert(cluster_def_dir.clone(), ResourceReference::cluster(customer, &cluster.name));

            catalog.clear();
            catalog.register_cluster(cluster, namespace)?;
            for service in catalog.names(namespace) {
                let dir = io::canonicalize(catalog.path(service, namespace)?)?;
                let Some(path) = dir.relative_to(canonical_root) else {
                    tracing::warn!(%dir, service, "Service directory lies outside the workspace, not indexed");
                    continue;
                };
                index.insert(path, ResourceReference::service(customer, &cluster.name, service));
            }
        }

        Ok(index)
    }

    /// Record that `path` owns `reference`.
    pub fn insert(&mut self, path: NormalizedPath, reference: ResourceReference) {
        self.trie.insert(&path);
        self.resources.entry(path).or_default().insert(reference);
    }

    /// Fold a partial index into this one.
    pub fn absorb(&mut self, other: ResourceIndex) {
        self.trie.absorb(other.trie);
        for (path, references) in other.resources {
            self.resources.entry(path).or_default().extend(references);
        }
    }

    /// References impacted by a change at `path` (workspace-relative).
    pub fn resources_for(&self, path: &NormalizedPath) -> BTreeSet<ResourceReference> {
        self.trie
            .longest_known(path)
            .and_then(|owner| self.resources.get(&owner))
            .cloned()
            .unwrap_or_default()
    }

    /// Union of [`ResourceIndex::resources_for`] over `paths`.
    pub fn resources_for_all<'p>(
        &self,
        paths: impl IntoIterator<Item = &'p NormalizedPath>,
    ) -> BTreeSet<ResourceReference> {
        paths
            .into_iter()
            .flat_map(|path| self.resources_for(path))
            .collect()
    }

    /// Paths owning at least one reference.
    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.resources.keys()
    }

    pub fn reference_count(&self) -> usize {
        self.resources.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
