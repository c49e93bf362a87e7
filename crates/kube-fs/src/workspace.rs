//! Workspace root discovery
//!
//! The workspace root is the first ancestor of the starting directory that
//! holds a `.git` directory. Ancestors inside a `.terragrunt-cache` tree are
//! skipped since those carry their own checkouts.

use crate::{Error, NormalizedPath, Result};
use std::path::{Path, PathBuf};

const GIT_DIR: &str = ".git";
const TERRAGRUNT_CACHE: &str = ".terragrunt-cache";

/// Walk up from `start` to the workspace root.
pub fn discover_root(start: impl AsRef<Path>) -> Result<NormalizedPath> {
    let start = start.as_ref();
    let absolute = dunce::canonicalize(start).map_err(|e| Error::io(start, e))?;

    let mut current: Option<&Path> = Some(&absolute);
    while let Some(dir) = current {
        let in_cache = dir
            .components()
            .any(|c| c.as_os_str() == TERRAGRUNT_CACHE);
        if !in_cache && dir.join(GIT_DIR).is_dir() {
            tracing::debug!(root = %dir.display(), "Discovered workspace root");
            return Ok(NormalizedPath::new(dir));
        }
        current = dir.parent();
    }

    Err(Error::WorkspaceRootNotFound {
        start: PathBuf::from(start),
    })
}
