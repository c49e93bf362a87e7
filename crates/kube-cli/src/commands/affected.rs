//! Affected command: map changed paths to the units to re-render

use colored::Colorize;
use kube_core::{ResourceIndex, ResourceReference, extract_clusters, merge_references};
use kube_fs::NormalizedPath;
use kube_meta::{ServiceNamespace, Workspace};
use std::collections::BTreeSet;

use crate::error::{CliError, Result};

/// How the impacted set is reduced and printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AffectedOptions {
    pub helm: bool,
    pub fast: bool,
    pub merge: bool,
    pub json: bool,
}

/// Turn command-line paths into workspace-relative paths.
pub fn normalize_paths(workspace: &Workspace, paths: &[String]) -> Result<Vec<NormalizedPath>> {
    paths
        .iter()
        .map(|raw| {
            let path = NormalizedPath::new(raw);
            if !path.is_absolute() {
                return Ok(path);
            }
            path.relative_to(workspace.root()).ok_or_else(|| {
                CliError::user(format!(
                    "{raw} is outside the workspace root {}",
                    workspace.root()
                ))
            })
        })
        .collect()
}

/// Units impacted by `changed`, reduced according to `options`.
pub fn collect_affected(
    workspace: &Workspace,
    changed: &[NormalizedPath],
    options: AffectedOptions,
) -> Result<BTreeSet<ResourceReference>> {
    let namespace = if options.helm {
        ServiceNamespace::Helm
    } else {
        ServiceNamespace::Native
    };
    let index = ResourceIndex::build(workspace, namespace)?;

    let mut impacted = index.resources_for_all(changed);
    if !options.fast {
        impacted = extract_clusters(&impacted);
    }
    if options.merge {
        impacted = merge_references(&impacted);
    }
    Ok(impacted)
}

/// Render the impacted set, one unit per line or as a JSON array.
pub fn render_affected(impacted: &BTreeSet<ResourceReference>, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(impacted)?;
        out.push('\n');
        return Ok(out);
    }
    Ok(impacted.iter().map(|r| format!("{r}\n")).collect())
}

/// Run the affected command
pub fn run_affected(
    workspace: &Workspace,
    paths: &[String],
    since: Option<&str>,
    options: AffectedOptions,
) -> Result<()> {
    let mut changed = normalize_paths(workspace, paths)?;
    if let Some(rev) = since {
        changed.extend(kube_git::changed_paths(workspace.root(), rev)?);
    }
    if changed.is_empty() && since.is_none() {
        return Err(CliError::user(
            "Nothing to check: pass changed paths or --since <revision>",
        ));
    }

    let impacted = collect_affected(workspace, &changed, options)?;
    print!("{}", render_affected(&impacted, options.json)?);

    if !options.json {
        eprintln!(
            "{} {} changed path(s), {} unit(s) to re-render",
            "Summary:".dimmed(),
            changed.len(),
            impacted.len().to_string().cyan()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube_test_utils::TestWorkspace;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
silo_regions:
  saas:
    k8s:
      root: k8s
      cluster_def_root: clusters/saas
      materialized_manifests: materialized/saas
"#;

    fn setup() -> (TestWorkspace, Workspace) {
        let ws = TestWorkspace::new();
        ws.write_config(CONFIG);
        ws.write("k8s/services/snuba/_values.yaml", "workers: 1\n");
        ws.write("k8s/services/relay/_values.yaml", "workers: 1\n");
        ws.write_cluster("k8s/clusters/saas", "pop", &["k8s/services/*"], "");
        ws.write_cluster("k8s/clusters/saas", "customer", &["k8s/services/snuba"], "");
        let workspace = Workspace::open(NormalizedPath::new(ws.root()), None).unwrap();
        (ws, workspace)
    }

    fn lines(impacted: &BTreeSet<ResourceReference>) -> Vec<String> {
        impacted.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_fast_reports_services() {
        let (_ws, workspace) = setup();
        let changed = [NormalizedPath::new("k8s/services/relay/_values.yaml")];
        let options = AffectedOptions {
            fast: true,
            ..AffectedOptions::default()
        };

        let impacted = collect_affected(&workspace, &changed, options).unwrap();
        assert_eq!(lines(&impacted), vec!["saas/pop/relay"]);
    }

    #[test]
    fn test_default_reports_whole_clusters() {
        let (_ws, workspace) = setup();
        let changed = [NormalizedPath::new("k8s/services/snuba/_values.yaml")];

        let impacted = collect_affected(&workspace, &changed, AffectedOptions::default()).unwrap();
        assert_eq!(lines(&impacted), vec!["saas/customer", "saas/pop"]);
    }

    #[test]
    fn test_merge_drops_services_covered_by_cluster() {
        let (_ws, workspace) = setup();
        let changed = [
            NormalizedPath::new("k8s/clusters/saas/pop.yaml"),
            NormalizedPath::new("k8s/services/relay/_values.yaml"),
        ];
        let options = AffectedOptions {
            fast: true,
            merge: true,
            ..AffectedOptions::default()
        };

        let impacted = collect_affected(&workspace, &changed, options).unwrap();
        assert_eq!(lines(&impacted), vec!["saas/customer", "saas/pop"]);
    }

    #[test]
    fn test_absolute_paths_are_made_relative() {
        let (ws, workspace) = setup();
        let absolute = ws.root().join("k8s/services/snuba/_values.yaml");
        let paths = vec![absolute.to_string_lossy().into_owned(), "README.md".to_string()];

        let normalized = normalize_paths(&workspace, &paths).unwrap();
        assert_eq!(
            normalized,
            vec![
                NormalizedPath::new("k8s/services/snuba/_values.yaml"),
                NormalizedPath::new("README.md"),
            ]
        );
    }

    #[test]
    fn test_parent_segments_reach_the_service() {
        let (_ws, workspace) = setup();
        let paths = vec!["k8s/x/../services/relay/_values.yaml".to_string()];
        let changed = normalize_paths(&workspace, &paths).unwrap();
        let options = AffectedOptions {
            fast: true,
            ..AffectedOptions::default()
        };

        let impacted = collect_affected(&workspace, &changed, options).unwrap();
        assert_eq!(lines(&impacted), vec!["saas/pop/relay"]);
    }

    #[test]
    fn test_absolute_path_outside_root_is_rejected() {
        let (_ws, workspace) = setup();
        let err = normalize_paths(&workspace, &["/definitely/elsewhere".to_string()]).unwrap_err();
        assert!(err.to_string().contains("outside the workspace root"));
    }

    #[test]
    fn test_json_output_is_an_array_of_references() {
        let impacted = BTreeSet::from([ResourceReference::service("saas", "pop", "snuba")]);
        let out = render_affected(&impacted, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([{"customer": "saas", "cluster": "pop", "service": "snuba"}])
        );
    }
}
