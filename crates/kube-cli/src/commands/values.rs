//! Values command: print the resolved configuration of one service

use kube_core::{OverrideResolver, Values};
use kube_meta::Workspace;

use crate::error::Result;

/// Resolve the configuration of one service.
pub fn resolve_values(
    workspace: &Workspace,
    customer: &str,
    cluster: &str,
    service: &str,
    helm: bool,
) -> Result<Values> {
    let resolver = if helm {
        OverrideResolver::helm(workspace)
    } else {
        OverrideResolver::new(workspace)
    };
    Ok(resolver.resolve(customer, cluster, service)?)
}

/// Render resolved values as YAML or pretty JSON.
pub fn render_values(values: &Values, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(values)?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(serde_yaml::to_string(values)?)
    }
}

/// Run the values command
pub fn run_values(
    workspace: &Workspace,
    customer: &str,
    cluster: &str,
    service: &str,
    helm: bool,
    json: bool,
) -> Result<()> {
    let values = resolve_values(workspace, customer, cluster, service, helm)?;
    print!("{}", render_values(&values, json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube_fs::NormalizedPath;
    use kube_test_utils::TestWorkspace;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
silo_regions:
  saas:
    aliases: [us]
    k8s:
      root: k8s
      cluster_def_root: clusters/saas
      materialized_manifests: materialized/saas
"#;

    fn setup() -> (TestWorkspace, Workspace) {
        let ws = TestWorkspace::new();
        ws.write_config(CONFIG);
        ws.write("k8s/services/snuba/_values.yaml", "workers: 1\nconfig: {a: 1}\n");
        ws.write("k8s/services/snuba/region_overrides/us/pop.yaml", "workers: 3\n");
        ws.write_cluster("k8s/clusters/saas", "pop", &["k8s/services/*"], "");
        let workspace = Workspace::open(NormalizedPath::new(ws.root()), None).unwrap();
        (ws, workspace)
    }

    #[test]
    fn test_renders_yaml() {
        let (_ws, workspace) = setup();
        let values = resolve_values(&workspace, "saas", "pop", "snuba", false).unwrap();
        assert_eq!(render_values(&values, false).unwrap(), "workers: 3\nconfig:\n  a: 1\n");
    }

    #[test]
    fn test_renders_json() {
        let (_ws, workspace) = setup();
        let values = resolve_values(&workspace, "us", "pop", "snuba", false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&render_values(&values, true).unwrap()).unwrap();
        assert_eq!(parsed, serde_json::json!({"workers": 3, "config": {"a": 1}}));
    }
}
