//! Renderable units and the reductions applied to sets of them.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A (customer, cluster, service) unit impacted by a change.
///
/// A reference without a service stands for the whole cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceReference {
    pub customer: String,
    pub cluster: String,
    pub service: Option<String>,
}

impl ResourceReference {
    pub fn new(customer: impl Into<String>, cluster: impl Into<String>, service: Option<String>) -> Self {
        Self {
            customer: customer.into(),
            cluster: cluster.into(),
            service,
        }
    }

    /// Reference to a whole cluster.
    pub fn cluster(customer: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self::new(customer, cluster, None)
    }

    /// Reference to one service of a cluster.
    pub fn service(customer: impl Into<String>, cluster: impl Into<String>, service: impl Into<String>) -> Self {
        Self::new(customer, cluster, Some(service.into()))
    }

    pub fn is_cluster(&self) -> bool {
        self.service.is_none()
    }

    /// This reference widened to its whole cluster.
    pub fn to_cluster(&self) -> Self {
        Self::cluster(self.customer.clone(), self.cluster.clone())
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.service {
            Some(service) => write!(f, "{}/{}/{}", self.customer, self.cluster, service),
            None => write!(f, "{}/{}", self.customer, self.cluster),
        }
    }
}

/// Drop service references whose cluster is referenced as a whole.
pub fn merge_references(refs: &BTreeSet<ResourceReference>) -> BTreeSet<ResourceReference> {
    let whole: HashSet<(&str, &str)> = refs
        .iter()
        .filter(|r| r.is_cluster())
        .map(|r| (r.customer.as_str(), r.cluster.as_str()))
        .collect();

    refs.iter()
        .filter(|r| r.is_cluster() || !whole.contains(&(r.customer.as_str(), r.cluster.as_str())))
        .cloned()
        .collect()
}

/// Widen every reference to its whole cluster.
pub fn extract_clusters(refs: &BTreeSet<ResourceReference>) -> BTreeSet<ResourceReference> {
    refs.iter().map(ResourceReference::to_cluster).collect()
}
