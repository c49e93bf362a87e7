//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kubeconf - Resolve service configuration and find what a change impacts
#[derive(Parser, Debug)]
#[command(name = "kubeconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (discovered from the current directory when omitted)
    #[arg(long, global = true, env = "KUBECONF_ROOT")]
    pub root: Option<PathBuf>,

    /// Workspace configuration file (defaults to cli_config/configuration.yaml under the root)
    #[arg(long, global = true, env = "KUBECONF_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved configuration of one service
    ///
    /// Examples:
    ///   kubeconf values saas pop snuba
    ///   kubeconf values us pop vector --helm --json
    Values {
        /// Customer (region) name or alias
        customer: String,

        /// Cluster name
        cluster: String,

        /// Service name
        service: String,

        /// Resolve a helm service instead of a native one
        #[arg(long)]
        helm: bool,

        /// Output as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// List the units to re-render after a change
    ///
    /// Without --fast every impacted cluster is reported whole, since
    /// services of a cluster may depend on one another.
    ///
    /// Examples:
    ///   kubeconf affected k8s/services/snuba/_values.yaml
    ///   kubeconf affected --since origin/main --fast --merge
    Affected {
        /// Changed paths, relative to the workspace root or absolute
        paths: Vec<String>,

        /// Also include every path changed since this git revision
        #[arg(long)]
        since: Option<String>,

        /// Scan helm services instead of native ones
        #[arg(long)]
        helm: bool,

        /// Report individual services instead of whole clusters
        #[arg(long)]
        fast: bool,

        /// Drop service entries of clusters that are already reported whole
        #[arg(long)]
        merge: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the configured customers and their aliases
    Regions,
}
