//! Workspace metadata for kubeconf.
//!
//! Parses the workspace configuration and cluster definition documents, and
//! keeps the catalog of service directories per cluster.

pub mod catalog;
pub mod cluster;
pub mod config;
pub mod error;
pub mod workspace;

pub use catalog::{ServiceCatalog, ServiceNamespace};
pub use cluster::{Cluster, HelmSpec};
pub use config::{K8sConfig, SiloRegion, WorkspaceConfig};
pub use error::{Error, Result};
pub use workspace::Workspace;
