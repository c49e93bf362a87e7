//! Integration tests for the resource index over on-disk workspaces

use kube_core::{ResourceIndex, ResourceReference, extract_clusters, merge_references};
use kube_fs::NormalizedPath;
use kube_meta::{ServiceNamespace, Workspace};
use kube_test_utils::TestWorkspace;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

const CONFIG: &str = r#"
silo_regions:
  saas:
    aliases: [us]
    k8s:
      root: k8s
      cluster_def_root: clusters/saas
      materialized_manifests: materialized/saas
  acme:
    k8s:
      root: k8s
      cluster_def_root: clusters/acme
      cluster_name: default
      materialized_manifests: materialized/acme
"#;

fn setup() -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.write_config(CONFIG);
    ws.write("k8s/services/snuba/_values.yaml", "workers: 1\n");
    ws.write("k8s/services/relay/_values.yaml", "workers: 1\n");
    ws.write("helm/services/vector/_values.yaml", "replicas: 1\n");
    ws.write_cluster(
        "k8s/clusters/saas",
        "pop",
        &["k8s/services/*"],
        "helm:\n  services:\n    - helm/services/vector\n",
    );
    ws.write_cluster("k8s/clusters/saas", "customer", &["k8s/services/snuba"], "");
    ws.write_cluster("k8s/clusters/acme", "default", &["k8s/services/relay"], "");
    ws
}

fn build(ws: &TestWorkspace, namespace: ServiceNamespace) -> ResourceIndex {
    kube_test_utils::init_tracing();
    let workspace = Workspace::open(NormalizedPath::new(ws.root()), None).unwrap();
    ResourceIndex::build(&workspace, namespace).unwrap()
}

fn lookup(index: &ResourceIndex, path: &str) -> Vec<String> {
    index
        .resources_for(&NormalizedPath::new(path))
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_service_change_hits_every_cluster_rendering_it() {
    let ws = setup();
    let index = build(&ws, ServiceNamespace::Native);

    assert_eq!(
        lookup(&index, "k8s/services/snuba/region_overrides/us/pop.yaml"),
        vec!["saas/customer/snuba", "saas/pop/snuba"]
    );
    assert_eq!(
        lookup(&index, "k8s/services/relay/_values.yaml"),
        vec!["acme/default/relay", "saas/pop/relay"]
    );
}

#[test]
fn test_cluster_definition_change_hits_every_cluster_of_customer() {
    let ws = setup();
    let index = build(&ws, ServiceNamespace::Native);

    assert_eq!(
        lookup(&index, "k8s/clusters/saas/pop.yaml"),
        vec!["saas/customer", "saas/pop"]
    );
    assert_eq!(lookup(&index, "k8s/clusters/acme/default.yaml"), vec!["acme/default"]);
}

#[test]
fn test_unrelated_and_partial_paths_hit_nothing() {
    let ws = setup();
    let index = build(&ws, ServiceNamespace::Native);

    assert!(lookup(&index, "README.md").is_empty());
    assert!(lookup(&index, "k8s/services").is_empty());
    assert!(lookup(&index, "k8s/services/unknown/_values.yaml").is_empty());
}

#[test]
fn test_helm_index_only_holds_helm_services() {
    let ws = setup();

    let helm = build(&ws, ServiceNamespace::Helm);
    assert_eq!(lookup(&helm, "helm/services/vector/_values.yaml"), vec!["saas/pop/vector"]);
    assert!(lookup(&helm, "k8s/services/snuba/_values.yaml").is_empty());

    let native = build(&ws, ServiceNamespace::Native);
    assert!(lookup(&native, "helm/services/vector/_values.yaml").is_empty());
}

#[test]
fn test_missing_cluster_definition_fails_the_build() {
    let ws = setup();
    std::fs::remove_file(ws.root().join("k8s/clusters/acme/default.yaml")).unwrap();

    let workspace = Workspace::open(NormalizedPath::new(ws.root()), None).unwrap();
    let err = ResourceIndex::build(&workspace, ServiceNamespace::Native).unwrap_err();
    assert!(matches!(
        err,
        kube_core::Error::Meta(kube_meta::Error::ClusterNotFound { ref customer, .. }) if customer == "acme"
    ));
}

#[cfg(unix)]
#[test]
fn test_symlinked_service_is_indexed_at_its_target() {
    let ws = setup();
    ws.write("templates/base/deployment.yaml", "kind: Deployment\n");
    ws.symlink_dir("templates/base", "k8s/services/base");

    let index = build(&ws, ServiceNamespace::Native);

    assert_eq!(lookup(&index, "templates/base/deployment.yaml"), vec!["saas/pop/base"]);
    assert!(lookup(&index, "k8s/services/base/deployment.yaml").is_empty());
}

#[cfg(unix)]
#[test]
fn test_service_outside_workspace_is_not_indexed() {
    let ws = setup();
    let outside = tempfile::TempDir::new().unwrap();
    let external = outside.path().join("k8s/services/snuba");
    std::fs::create_dir_all(&external).unwrap();
    std::os::unix::fs::symlink(&external, ws.root().join("k8s/services/vendored")).unwrap();

    let index = build(&ws, ServiceNamespace::Native);

    assert!(index.paths().all(|path| !path.is_absolute()));
    assert!(!index.paths().any(|path| path.as_str().ends_with("vendored")));
    assert_eq!(
        lookup(&index, "k8s/services/snuba/_values.yaml"),
        vec!["saas/customer/snuba", "saas/pop/snuba"]
    );
}

#[test]
fn test_changeset_reduction() {
    let ws = setup();
    let index = build(&ws, ServiceNamespace::Native);

    let changed = [
        NormalizedPath::new("k8s/clusters/acme/default.yaml"),
        NormalizedPath::new("k8s/services/relay/_values.yaml"),
        NormalizedPath::new("k8s/services/snuba/_values.yaml"),
    ];
    let impacted = index.resources_for_all(&changed);

    assert_eq!(
        merge_references(&impacted),
        BTreeSet::from([
            ResourceReference::cluster("acme", "default"),
            ResourceReference::service("saas", "customer", "snuba"),
            ResourceReference::service("saas", "pop", "relay"),
            ResourceReference::service("saas", "pop", "snuba"),
        ])
    );
    assert_eq!(
        extract_clusters(&impacted),
        BTreeSet::from([
            ResourceReference::cluster("acme", "default"),
            ResourceReference::cluster("saas", "customer"),
            ResourceReference::cluster("saas", "pop"),
        ])
    );
}
