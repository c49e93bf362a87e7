use criterion::{Criterion, criterion_group, criterion_main};
use kube_core::{ResourceIndex, ResourceReference};
use kube_fs::NormalizedPath;
use std::hint::black_box;

fn synthetic_index(customers: usize, clusters: usize, services: usize) -> ResourceIndex {
    let mut index = ResourceIndex::new();
    for c in 0..customers {
        let customer = format!("customer{c}");
        for cl in 0..clusters {
            let cluster = format!("cluster{cl}");
            index.insert(
                NormalizedPath::new(format!("k8s/clusters/{customer}")),
                ResourceReference::cluster(customer.clone(), cluster.clone()),
            );
            for s in 0..services {
                index.insert(
                    NormalizedPath::new(format!("k8s/services/service{s}")),
                    ResourceReference::service(customer.clone(), cluster.clone(), format!("service{s}")),
                );
            }
        }
    }
    index
}

fn benchmark_resource_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource_index");
    let index = synthetic_index(10, 5, 200);

    let hit = NormalizedPath::new("k8s/services/service150/region_overrides/us/cluster3.yaml");
    group.bench_function("resources_for_hit", |b| {
        b.iter(|| index.resources_for(black_box(&hit)))
    });

    let miss = NormalizedPath::new("terraform/modules/network/main.tf");
    group.bench_function("resources_for_miss", |b| {
        b.iter(|| index.resources_for(black_box(&miss)))
    });

    group.bench_function("build_synthetic", |b| {
        b.iter(|| synthetic_index(black_box(10), 5, 50))
    });

    group.finish();
}

criterion_group!(benches, benchmark_resource_lookup);
criterion_main!(benches);
