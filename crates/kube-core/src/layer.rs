//! Layer loading: one directory level of override files unioned into a
//! single mapping under a [`MergeConfig`].

use kube_fs::{ConfigStore, NormalizedPath, io};
use serde_yaml::Value;

use crate::merge_config::{MergeConfig, Policy};
use crate::values::{Values, into_values};
use crate::{Error, Result};

/// Extension of override files.
pub const OVERRIDE_EXTENSION: &str = ".yaml";

/// Suffix of the tool-managed override file of a cluster.
pub const MANAGED_SUFFIX: &str = ".managed.yaml";

/// Union the top-level keys of `files` into one mapping.
///
/// Files are read in lexicographic order and missing files are skipped. A
/// key seen a second time is resolved with `merge.policy_for(key)`.
pub fn merge_values_files_no_conflict(files: &[NormalizedPath], merge: &MergeConfig) -> Result<Values> {
    let mut sorted: Vec<&NormalizedPath> = files.iter().collect();
    sorted.sort();

    let store = ConfigStore::new();
    let mut result = Values::new();

    for file in sorted {
        let Some(document) = store.load_optional_value(file)? else {
            continue;
        };
        let incoming = into_values(document, file)?;
        tracing::trace!(%file, keys = incoming.len(), "Merging layer file");

        for (key, value) in incoming {
            let Some(existing) = result.get_mut(&key) else {
                result.insert(key, value);
                continue;
            };

            let name = key_name(&key);
            match merge.policy_for(&name) {
                Policy::Reject => {
                    return Err(Error::Conflict {
                        file: file.to_native(),
                        key: name,
                    });
                }
                Policy::Overwrite => *existing = value,
                Policy::Append => match (existing, value) {
                    (Value::Mapping(existing), Value::Mapping(incoming)) => {
                        for (k, v) in incoming {
                            existing.insert(k, v);
                        }
                    }
                    _ => {
                        return Err(Error::TypeMismatch {
                            file: file.to_native(),
                            key: name,
                        });
                    }
                },
            }
        }
    }

    Ok(result)
}

/// Union every `<prefix>*.yaml` file directly under `dir`.
pub fn load_prefixed(dir: &NormalizedPath, prefix: &str, merge: &MergeConfig) -> Result<Values> {
    let files = io::list_files_matching(dir, prefix, OVERRIDE_EXTENSION)?;
    merge_values_files_no_conflict(&files, merge)
}

/// Union the cluster-specific files `<cluster>*.yaml` directly under `dir`,
/// leaving out the tool-managed `<cluster>.managed.yaml`.
pub fn load_cluster_files(dir: &NormalizedPath, cluster: &str, merge: &MergeConfig) -> Result<Values> {
    let files: Vec<NormalizedPath> = io::list_files_matching(dir, cluster, OVERRIDE_EXTENSION)?
        .into_iter()
        .filter(|p| !p.as_str().ends_with(MANAGED_SUFFIX))
        .collect();
    merge_values_files_no_conflict(&files, merge)
}

/// Load one document as a mapping, or an empty mapping when absent.
pub fn load_optional(path: &NormalizedPath) -> Result<Values> {
    match ConfigStore::new().load_optional_value(path)? {
        Some(document) => into_values(document, path),
        None => Ok(Values::new()),
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
