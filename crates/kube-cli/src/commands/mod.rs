//! Command implementations for kube-cli

pub mod affected;
pub mod regions;
pub mod values;

pub use affected::{AffectedOptions, run_affected};
pub use regions::run_regions;
pub use values::run_values;
