//! Git access for kubeconf
//!
//! Turns a base revision into the list of workspace paths that changed since,
//! which the reverse index maps back to the units to re-render.

pub mod diff;
pub mod error;

pub use diff::changed_paths;
pub use error::{Error, Result};
