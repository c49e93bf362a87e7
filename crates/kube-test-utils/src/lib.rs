//! Shared test utilities for the kubeconf workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures at two realism levels
//! - [`workspace`]: [`TestWorkspace`] builder for on-disk override trees

pub mod git;
pub mod workspace;

pub use workspace::TestWorkspace;

/// Install a test-friendly tracing subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
