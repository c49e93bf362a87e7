//! Override resolution
//!
//! Computes the configuration mapping of one (customer, cluster, service)
//! by merging, in precedence order:
//!
//! 1. service defaults (`<service>/_values*.yaml`)
//! 2. either the direct regional override
//!    (`region_overrides/<region>/_values*.yaml`, then the cluster files),
//!    or the first hierarchical group providing one
//!    (`region_overrides/<group>/_values*.yaml`, then
//!    `region_overrides/<group>/<region>/...`)
//! 3. the tool-managed `region_overrides/<region>/<cluster>.managed.yaml`
//! 4. the service block of the cluster definition
//!
//! Each layer is unioned under the service's [`MergeConfig`] and then
//! deep-merged over the previous ones.

use kube_fs::{NormalizedPath, io};
use kube_meta::{Cluster, ServiceCatalog, ServiceNamespace, Workspace};
use serde_yaml::Value;

use crate::layer::{MANAGED_SUFFIX, load_cluster_files, load_optional, load_prefixed};
use crate::merge_config::MergeConfig;
use crate::values::{Values, deep_merge};
use crate::{Error, Result};

/// Prefix of configuration value files.
pub const VALUES_PREFIX: &str = "_values";

/// Prefix of helm chart context files.
pub const HELM_PREFIX: &str = "_helm";

/// Directory holding the regional overrides of a service.
pub const REGION_OVERRIDES_DIR: &str = "region_overrides";

/// Name of the override directory of a customer.
///
/// The `saas` customer keeps its overrides under `us`.
pub fn region_dir_name(customer: &str) -> &str {
    match customer {
        "saas" => "us",
        other => other,
    }
}

/// Resolves service configuration against a [`Workspace`].
///
/// The resolver holds no state between calls: resolving the same triple
/// twice reads the same files and yields the same mapping.
#[derive(Debug, Clone, Copy)]
pub struct OverrideResolver<'a> {
    workspace: &'a Workspace,
    namespace: ServiceNamespace,
    prefix: &'static str,
}

impl<'a> OverrideResolver<'a> {
    /// Resolver for the values of native services.
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            namespace: ServiceNamespace::Native,
            prefix: VALUES_PREFIX,
        }
    }

    /// Resolver for the values of helm services.
    pub fn helm(workspace: &'a Workspace) -> Self {
        Self {
            namespace: ServiceNamespace::Helm,
            ..Self::new(workspace)
        }
    }

    /// Read `<prefix>*.yaml` files instead of `_values*.yaml`.
    ///
    /// Any prefix other than `_values` skips the ambiguity check and the
    /// cluster definition data.
    pub fn with_prefix(self, prefix: &'static str) -> Self {
        Self { prefix, ..self }
    }

    pub fn namespace(&self) -> ServiceNamespace {
        self.namespace
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Resolve the configuration of `service` in `cluster` of `customer`.
    ///
    /// `customer` may be an alias. The service is looked up in the catalog
    /// built from the cluster definition.
    pub fn resolve(&self, customer: &str, cluster: &str, service: &str) -> Result<Values> {
        let (customer, _) = self.workspace.region(customer)?;
        let cluster = self.workspace.cluster(customer, cluster)?;
        let catalog = ServiceCatalog::for_cluster(self.workspace.root().clone(), &cluster, self.namespace)?;
        let service_dir = catalog.path(service, self.namespace)?;

        self.resolve_dir(customer, &cluster, service, service_dir)
    }

    /// Resolve the configuration of the service rooted at `service_dir`.
    pub fn resolve_dir(
        &self,
        customer: &str,
        cluster: &Cluster,
        service: &str,
        service_dir: &NormalizedPath,
    ) -> Result<Values> {
        let region = region_dir_name(customer);
        let overrides = service_dir.join(REGION_OVERRIDES_DIR);
        let merge = MergeConfig::for_service(service_dir)?;

        tracing::debug!(
            customer,
            region,
            cluster = %cluster.name,
            service,
            namespace = %self.namespace,
            prefix = self.prefix,
            "Resolving service configuration"
        );

        if self.prefix == VALUES_PREFIX {
            check_unambiguous(service, region, &overrides)?;
        }

        let mut result = load_prefixed(service_dir, self.prefix, &merge)?;
        tracing::debug!(%service_dir, keys = result.len(), "Loaded service defaults");

        let direct = overrides.join(region);
        let (common, specific) = self.regional_layers(&direct, &cluster.name, &merge)?;
        if !common.is_empty() || !specific.is_empty() {
            tracing::debug!(%direct, "Applying direct regional override");
            deep_merge(&mut result, &common);
            deep_merge(&mut result, &specific);
        } else {
            self.merge_first_group(&mut result, &overrides, region, &cluster.name, &merge)?;
        }

        if self.namespace == ServiceNamespace::Native && self.prefix == VALUES_PREFIX {
            let managed = direct.join(&format!("{}{MANAGED_SUFFIX}", cluster.name));
            let values = load_optional(&managed)?;
            if !values.is_empty() {
                tracing::debug!(%managed, "Applying tool-managed override");
                deep_merge(&mut result, &values);
            }
        }

        if self.prefix == VALUES_PREFIX {
            let data = self.cluster_data(cluster, service)?;
            if !data.is_empty() {
                tracing::debug!(cluster = %cluster.name, service, "Applying cluster definition data");
                deep_merge(&mut result, &data);
            }
        }

        Ok(result)
    }

    /// The common and cluster-specific sub-layers under `region_dir`.
    fn regional_layers(
        &self,
        region_dir: &NormalizedPath,
        cluster: &str,
        merge: &MergeConfig,
    ) -> Result<(Values, Values)> {
        let common = load_prefixed(region_dir, self.prefix, merge)?;
        let specific = match self.namespace {
            ServiceNamespace::Native => load_cluster_files(region_dir, cluster, merge)?,
            ServiceNamespace::Helm => load_prefixed(&region_dir.join(cluster), self.prefix, merge)?,
        };
        Ok((common, specific))
    }

    /// Merge the first group of `region_overrides` holding content for
    /// `region`. Later groups are never read.
    fn merge_first_group(
        &self,
        result: &mut Values,
        overrides: &NormalizedPath,
        region: &str,
        cluster: &str,
        merge: &MergeConfig,
    ) -> Result<()> {
        for group in io::list_subdirs(overrides)? {
            let region_dir = group.join(region);
            let (common, specific) = self.regional_layers(&region_dir, cluster, merge)?;
            if common.is_empty() && specific.is_empty() {
                continue;
            }

            tracing::debug!(%group, region, "Applying hierarchical group override");
            let defaults = load_prefixed(&group, self.prefix, merge)?;
            deep_merge(result, &defaults);
            deep_merge(result, &common);
            deep_merge(result, &specific);
            return Ok(());
        }

        tracing::debug!(%overrides, region, "No regional override found");
        Ok(())
    }

    /// Data the cluster definition holds for `service`.
    fn cluster_data(&self, cluster: &Cluster, service: &str) -> Result<Values> {
        match self.namespace {
            ServiceNamespace::Native => match cluster.service_data(service) {
                None | Some(Value::Null) => Ok(Values::new()),
                Some(Value::Mapping(data)) => Ok(data.clone()),
                Some(_) => Err(Error::InvalidClusterData {
                    cluster: cluster.name.clone(),
                    service: service.to_string(),
                }),
            },
            ServiceNamespace::Helm => {
                let mut data = cluster.data.clone();
                deep_merge(&mut data, &cluster.helm.values);
                if let Some(values) = cluster.helm.service_values.get(service) {
                    deep_merge(&mut data, values);
                }
                Ok(data)
            }
        }
    }
}

/// Fail when `region` has override directories in more than one place.
fn check_unambiguous(service: &str, region: &str, overrides: &NormalizedPath) -> Result<()> {
    let mut locations = Vec::new();
    if overrides.join(region).is_dir() {
        locations.push(format!("{REGION_OVERRIDES_DIR}/{region}"));
    }
    for group in io::list_subdirs(overrides)? {
        if group.join(region).is_dir() {
            let name = group.file_name().unwrap_or_default();
            locations.push(format!("{REGION_OVERRIDES_DIR}/{name}/{region}"));
        }
    }

    if locations.len() > 1 {
        tracing::warn!(service, region, ?locations, "Ambiguous regional override");
        return Err(Error::AmbiguousOverride {
            service: service.to_string(),
            region: region.to_string(),
            locations,
        });
    }
    Ok(())
}
