//! kubeconf CLI
//!
//! Resolves service configuration and reports which units a change impacts.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::AffectedOptions;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.root.as_deref(), cli.config.as_deref()),
        None => {
            println!("{} Kubernetes configuration resolver", "kubeconf".green().bold());
            println!();
            println!("Run {} for available commands.", "kubeconf --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, root: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let workspace = context::open_workspace(&cwd, root, config)?;

    match cmd {
        Commands::Values {
            customer,
            cluster,
            service,
            helm,
            json,
        } => commands::run_values(&workspace, &customer, &cluster, &service, helm, json),
        Commands::Affected {
            paths,
            since,
            helm,
            fast,
            merge,
            json,
        } => commands::run_affected(
            &workspace,
            &paths,
            since.as_deref(),
            AffectedOptions {
                helm,
                fast,
                merge,
                json,
            },
        ),
        Commands::Regions => commands::run_regions(&workspace),
    }
}
