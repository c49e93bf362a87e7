//! Configuration resolution and change impact for kubeconf
//!
//! This crate implements the two halves of the render pipeline's core:
//!
//! - **Override resolution**: merge a service's defaults, regional and
//!   cluster overrides, tool-managed overrides and cluster definition data
//!   into one configuration mapping
//! - **Reverse index**: map changed paths back to the
//!   (customer, cluster, service) units that must be re-rendered
//!
//! # Architecture
//!
//! ```text
//!                  kube-cli
//!                     |
//!                 kube-core
//!                     |
//!          +----------+----------+
//!          |                     |
//!      kube-meta              kube-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use kube_core::{OverrideResolver, ResourceIndex};
//! use kube_meta::{ServiceNamespace, Workspace};
//!
//! let workspace = Workspace::open(root, None)?;
//! let values = OverrideResolver::new(&workspace).resolve("saas", "pop", "snuba")?;
//!
//! let index = ResourceIndex::build(&workspace, ServiceNamespace::Native)?;
//! let impacted = index.resources_for(&"k8s/services/snuba/_values.yaml".into());
//! ```

pub mod error;
pub mod layer;
pub mod merge_config;
pub mod resolver;
pub mod reversemap;
pub mod values;

pub use error::{Error, Result};
pub use layer::merge_values_files_no_conflict;
pub use merge_config::{MergeConfig, Policy};
pub use resolver::{HELM_PREFIX, OverrideResolver, VALUES_PREFIX, region_dir_name};
pub use reversemap::{PathTrie, ResourceIndex, ResourceReference, extract_clusters, merge_references};
pub use values::{Values, deep_merge, deep_merge_with};
