//! Regions command: list customers

use colored::Colorize;
use kube_meta::Workspace;

use crate::error::Result;

/// Run the regions command
pub fn run_regions(workspace: &Workspace) -> Result<()> {
    let config = workspace.config();

    println!("{}", "Customers".bold());
    println!();

    for (name, region) in &config.silo_regions {
        let clusters = match &region.k8s.cluster_name {
            Some(cluster) => format!("cluster {cluster}"),
            None => format!("clusters in {}", region.k8s.cluster_def_dir()),
        };
        if region.aliases.is_empty() {
            println!("  {:<14} {}", name.green(), clusters.dimmed());
        } else {
            println!(
                "  {:<14} {} (aliases: {})",
                name.green(),
                clusters.dimmed(),
                region.aliases.join(", ").cyan()
            );
        }
    }

    println!();
    println!(
        "{} {} customers configured.",
        "Total:".dimmed(),
        config.silo_regions.len()
    );
    Ok(())
}
