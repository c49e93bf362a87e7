//! Cluster definition documents
//!
//! Each cluster of a customer is described by `<cluster_def_root>/<name>.yaml`.
//! The `services` key lists service directory patterns, the optional `helm`
//! key lists helm services, and every other top-level key is cluster data:
//! per-service static blocks keyed by service name plus cluster-wide facts.

use indexmap::IndexMap;
use kube_fs::{ConfigStore, NormalizedPath, io};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

const SERVICES_KEY: &str = "services";
const HELM_KEY: &str = "helm";

/// Helm part of a cluster definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelmSpec {
    /// Helm service directory patterns
    pub services: Vec<String>,
    /// Values shared by every helm service of the cluster
    pub values: Mapping,
    /// Per-service values, keyed by service name (last path segment)
    pub service_values: IndexMap<String, Mapping>,
}

/// One parsed cluster definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub name: String,
    /// Service directory patterns, relative to the workspace root
    pub services: Vec<String>,
    /// Everything but `services` and `helm`
    pub data: Mapping,
    pub helm: HelmSpec,
}

impl Cluster {
    /// Parse a cluster definition document.
    pub fn from_document(name: &str, document: Value, path: &NormalizedPath) -> Result<Self> {
        let invalid = |message: String| Error::InvalidConfig {
            path: path.to_native(),
            message,
        };

        let mut data = match document {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            _ => return Err(invalid("cluster definition must be a mapping".into())),
        };

        let services = match data.shift_remove(SERVICES_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => string_list(&value)
                .ok_or_else(|| invalid("`services` must be a list of strings".into()))?,
        };

        let helm = match data.shift_remove(HELM_KEY) {
            None | Some(Value::Null) => HelmSpec::default(),
            Some(Value::Mapping(spec)) => parse_helm(&spec).map_err(invalid)?,
            Some(_) => return Err(invalid("`helm` must be a mapping".into())),
        };

        Ok(Self {
            name: name.to_string(),
            services,
            data,
            helm,
        })
    }

    /// Load `<dir>/<name>.yaml`. A missing file is `ClusterNotFound`.
    pub fn load(customer: &str, dir: &NormalizedPath, name: &str) -> Result<Self> {
        let path = dir.join(&format!("{name}.yaml"));
        if !path.is_file() {
            return Err(Error::ClusterNotFound {
                customer: customer.to_string(),
                cluster: name.to_string(),
                path: path.to_native(),
            });
        }
        let document = ConfigStore::new().load_value(&path)?;
        tracing::debug!(%path, cluster = name, "Loaded cluster definition");
        Self::from_document(name, document, &path)
    }

    /// Static data block of one service, if the definition carries one.
    pub fn service_data(&self, service: &str) -> Option<&Value> {
        self.data.get(service)
    }

    /// Names of the native services (last segment of each pattern).
    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().filter_map(|p| last_segment(p)).collect()
    }

    /// Names of the helm services (last segment of each pattern).
    pub fn helm_service_names(&self) -> Vec<&str> {
        self.helm.services.iter().filter_map(|p| last_segment(p)).collect()
    }
}

/// Cluster names defined in `dir`: every non-directory entry not starting
/// with `_`, named after the file up to its last `.`.
pub fn cluster_names(dir: &NormalizedPath) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in io::list_dir(dir)? {
        let Some(file_name) = entry.file_name() else {
            continue;
        };
        if file_name.starts_with('_') || entry.is_dir() {
            continue;
        }
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _)| stem);
        names.push(stem.to_string());
    }
    Ok(names)
}

fn last_segment(pattern: &str) -> Option<&str> {
    pattern.trim_end_matches('/').rsplit('/').next()
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_sequence()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn parse_helm(spec: &Mapping) -> std::result::Result<HelmSpec, String> {
    let values = match spec.get("values") {
        None | Some(Value::Null) => Mapping::new(),
        Some(Value::Mapping(m)) => m.clone(),
        Some(_) => return Err("`helm.values` must be a mapping".into()),
    };

    let mut helm = HelmSpec {
        values,
        ..HelmSpec::default()
    };

    let entries = match spec.get(SERVICES_KEY) {
        None | Some(Value::Null) => return Ok(helm),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err("`helm.services` must be a list".into()),
    };

    for entry in entries {
        match entry {
            Value::String(pattern) => {
                register_helm_service(&mut helm, pattern, Mapping::new());
            }
            Value::Mapping(svc) => {
                // Entries without a path are ignored
                let Some(pattern) = svc.get("path").and_then(Value::as_str) else {
                    continue;
                };
                let values = match svc.get("values") {
                    Some(Value::Mapping(m)) => m.clone(),
                    None | Some(Value::Null) => Mapping::new(),
                    Some(_) => {
                        return Err(format!("`values` of helm service {pattern} must be a mapping"));
                    }
                };
                register_helm_service(&mut helm, pattern, values);
            }
            _ => return Err("helm service entries must be strings or mappings".into()),
        }
    }
    Ok(helm)
}

fn register_helm_service(helm: &mut HelmSpec, pattern: &str, values: Mapping) {
    if let Some(name) = last_segment(pattern) {
        helm.service_values.insert(name.to_string(), values);
    }
    helm.services.push(pattern.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_splits_services_helm_and_data() {
        let cluster = Cluster::from_document(
            "pop",
            doc(r#"
services:
  - k8s/services/snuba
  - k8s/services/relay
helm:
  values:
    region: us-east1
  services:
    - helm/services/vector
    - path: helm/services/ingest
      values:
        replicas: 2
    - values: {ignored: true}
project: internal
snuba:
  workers: 4
"#),
            &NormalizedPath::new("k8s/clusters/saas/pop.yaml"),
        )
        .unwrap();

        assert_eq!(cluster.service_names(), vec!["snuba", "relay"]);
        assert_eq!(cluster.helm_service_names(), vec!["vector", "ingest"]);
        assert_eq!(cluster.helm.values.get("region"), Some(&Value::from("us-east1")));
        assert_eq!(
            cluster.helm.service_values["ingest"].get("replicas"),
            Some(&Value::from(2))
        );
        assert!(cluster.data.get("services").is_none());
        assert!(cluster.data.get("helm").is_none());
        assert_eq!(cluster.service_data("snuba").unwrap()["workers"], Value::from(4));
        assert!(cluster.service_data("relay").is_none());
    }

    #[test]
    fn test_rejects_non_mapping_document() {
        let err = Cluster::from_document(
            "pop",
            doc("[1, 2]"),
            &NormalizedPath::new("pop.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_rejects_non_string_services() {
        let err = Cluster::from_document(
            "pop",
            doc("services: [{a: 1}]"),
            &NormalizedPath::new("pop.yaml"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("`services` must be a list of strings"));
    }
}
