//! Integration tests for workspace, cluster and catalog loading

use kube_fs::NormalizedPath;
use kube_meta::{Error, ServiceCatalog, ServiceNamespace, Workspace};
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
    ws.mkdir("k8s/services/snuba");
    ws.mkdir("k8s/services/relay");
    ws.mkdir("k8s/services/customers");
    ws.write("k8s/services/README.md", "not a service");
    ws.write_cluster("k8s/clusters/saas", "pop", &["k8s/services/*"], "snuba:\n  workers: 2\n");
    ws.write_cluster("k8s/clusters/saas", "customer", &["k8s/services/snuba"], "");
    ws.write("k8s/clusters/saas/_shared.yaml", "ignored: true\n");
    ws.mkdir("k8s/clusters/saas/templates");
    ws.write_cluster("k8s/clusters/acme", "default", &["k8s/services/relay"], "");
    ws
}

fn open(ws: &TestWorkspace) -> Workspace {
    Workspace::open(NormalizedPath::new(ws.root()), None).unwrap()
}

#[test]
fn test_lists_every_cluster_definition_file() {
    let ws = setup();
    let workspace = open(&ws);

    let names: Vec<String> = workspace
        .clusters("saas")
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(names, vec!["customer", "pop"]);
}

#[test]
fn test_single_cluster_customer_uses_configured_cluster() {
    let ws = setup();
    let workspace = open(&ws);

    let clusters = workspace.clusters("acme").unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].name, "default");

    let cluster = workspace.cluster("acme", "whatever").unwrap();
    assert_eq!(cluster.name, "default");
}

#[test]
fn test_cluster_lookup_through_alias() {
    let ws = setup();
    let workspace = open(&ws);

    let cluster = workspace.cluster("us", "pop").unwrap();
    assert_eq!(cluster.service_data("snuba").unwrap()["workers"], serde_yaml::Value::from(2));
}

#[test]
fn test_missing_cluster_is_reported() {
    let ws = setup();
    let workspace = open(&ws);

    let err = workspace.cluster("saas", "nowhere").unwrap_err();
    assert!(matches!(
        err,
        Error::ClusterNotFound { ref customer, ref cluster, .. } if customer == "saas" && cluster == "nowhere"
    ));
}

#[test]
fn test_missing_configuration_is_reported() {
    let ws = TestWorkspace::new();
    let err = Workspace::open(NormalizedPath::new(ws.root()), None).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
}

#[test]
fn test_materialized_path_layout() {
    let ws = setup();
    let workspace = open(&ws);

    let path = workspace.materialized_path("saas", "pop", "snuba").unwrap();
    let relative = path.relative_to(workspace.root()).unwrap();
    assert_eq!(relative.as_str(), "k8s/materialized/saas/pop/snuba/deployment.yaml");
}

#[test]
fn test_catalog_registers_directories_and_skips_customers() {
    let ws = setup();
    let workspace = open(&ws);
    let cluster = workspace.cluster("saas", "pop").unwrap();

    let catalog = ServiceCatalog::for_cluster(
        workspace.root().clone(),
        &cluster,
        ServiceNamespace::Native,
    )
    .unwrap();

    assert_eq!(catalog.names(ServiceNamespace::Native), vec!["relay", "snuba"]);
    assert!(!catalog.contains("customers", ServiceNamespace::Native));
    assert!(catalog.names(ServiceNamespace::Helm).is_empty());
    assert!(
        catalog
            .path("snuba", ServiceNamespace::Native)
            .unwrap()
            .as_str()
            .ends_with("k8s/services/snuba")
    );
}

#[test]
fn test_catalog_registers_nested_services_through_double_star() {
    let ws = TestWorkspace::new();
    ws.mkdir("platform/snuba");
    ws.mkdir("platform/team/relay");
    let mut catalog = ServiceCatalog::new(NormalizedPath::new(ws.root()));

    catalog
        .register(ServiceNamespace::Native, &["platform/**"])
        .unwrap();

    assert_eq!(
        catalog.names(ServiceNamespace::Native),
        vec!["platform", "snuba", "team", "relay"]
    );
}

#[test]
fn test_catalog_rejects_duplicates_and_dangling_patterns() {
    let ws = setup();
    let mut catalog = ServiceCatalog::new(NormalizedPath::new(ws.root()));

    let err = catalog
        .register(ServiceNamespace::Native, &["k8s/services/snuba", "k8s/services/snuba"])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateService { ref name, .. } if name == "snuba"));

    catalog.clear();
    assert!(catalog.is_empty());

    let err = catalog
        .register(ServiceNamespace::Native, &["k8s/services/ghost"])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidServicePath { ref pattern } if pattern == "k8s/services/ghost"));
}

#[test]
fn test_unknown_service_names_namespace() {
    let ws = setup();
    let catalog = ServiceCatalog::new(NormalizedPath::new(ws.root()));
    let err = catalog.path("snuba", ServiceNamespace::Helm).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Service named snuba was not found in the helm namespace"
    );
}
