//! Service catalog: which directory renders which service.
//!
//! A catalog is filled from the service patterns of one cluster definition
//! and cleared before moving to the next cluster. It is an explicit value
//! handed to whoever needs service directories, never process-wide state.

use indexmap::IndexMap;
use kube_fs::{NormalizedPath, glob};
use std::fmt;

use crate::cluster::Cluster;
use crate::error::{Error, Result};

/// Directory name that is never a service even when a pattern matches it.
const CUSTOMERS_DIR: &str = "customers";

/// Which family of services a catalog entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceNamespace {
    /// Template-rendered manifests
    Native,
    /// Helm releases
    Helm,
}

impl ServiceNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Helm => "helm",
        }
    }
}

impl fmt::Display for ServiceNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered registry of service name to service directory, per namespace.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    root: NormalizedPath,
    services: IndexMap<ServiceNamespace, IndexMap<String, NormalizedPath>>,
}

impl ServiceCatalog {
    /// Create an empty catalog whose patterns resolve under `root`.
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            services: IndexMap::new(),
        }
    }

    /// Create a catalog holding the services of `cluster` in `namespace`.
    pub fn for_cluster(
        root: NormalizedPath,
        cluster: &Cluster,
        namespace: ServiceNamespace,
    ) -> Result<Self> {
        let mut catalog = Self::new(root);
        catalog.register_cluster(cluster, namespace)?;
        Ok(catalog)
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Register the services `cluster` declares for `namespace`.
    pub fn register_cluster(&mut self, cluster: &Cluster, namespace: ServiceNamespace) -> Result<()> {
        match namespace {
            ServiceNamespace::Native => self.register(namespace, &cluster.services),
            ServiceNamespace::Helm => self.register(namespace, &cluster.helm.services),
        }
    }

    /// Expand each pattern relative to the root and register every matching
    /// directory under its name.
    ///
    /// A pattern matching nothing is an error, as is a service name seen
    /// twice in the same namespace. Non-directories and the `customers`
    /// directory are skipped.
    pub fn register<S: AsRef<str>>(&mut self, namespace: ServiceNamespace, patterns: &[S]) -> Result<()> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let paths = glob::expand(&self.root, pattern)?;
            if paths.is_empty() {
                return Err(Error::InvalidServicePath {
                    pattern: pattern.to_string(),
                });
            }

            let entries = self.services.entry(namespace).or_default();
            for path in paths {
                if !path.is_dir() {
                    continue;
                }
                let Some(name) = path.file_name().map(str::to_string) else {
                    continue;
                };
                if entries.contains_key(&name) {
                    return Err(Error::DuplicateService {
                        name,
                        path: path.to_native(),
                    });
                }
                if name == CUSTOMERS_DIR {
                    continue;
                }
                tracing::trace!(%namespace, service = %name, %path, "Registered service");
                entries.insert(name, path);
            }
        }
        Ok(())
    }

    /// Forget every registered service in every namespace.
    pub fn clear(&mut self) {
        self.services.clear();
    }

    /// Directory of `name` in `namespace`.
    pub fn path(&self, name: &str, namespace: ServiceNamespace) -> Result<&NormalizedPath> {
        self.services
            .get(&namespace)
            .and_then(|entries| entries.get(name))
            .ok_or_else(|| Error::ServiceNotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            })
    }

    /// Registered service names in registration order.
    pub fn names(&self, namespace: ServiceNamespace) -> Vec<&str> {
        self.services
            .get(&namespace)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str, namespace: ServiceNamespace) -> bool {
        self.path(name, namespace).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.services.values().all(IndexMap::is_empty)
    }
}
