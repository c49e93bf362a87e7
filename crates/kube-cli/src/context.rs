//! Workspace detection
//!
//! Commands work from anywhere inside the workspace: the root is taken from
//! `--root` / `KUBECONF_ROOT` when given, otherwise discovered by walking up
//! to the enclosing git checkout.

use kube_fs::{NormalizedPath, discover_root};
use kube_meta::Workspace;
use std::path::Path;

use crate::error::Result;

/// Open the workspace for a command invocation.
pub fn open_workspace(cwd: &Path, root: Option<&Path>, config: Option<&Path>) -> Result<Workspace> {
    let root = match root {
        Some(root) => NormalizedPath::new(cwd.join(root)),
        None => discover_root(cwd)?,
    };
    let config = config.map(|path| NormalizedPath::new(cwd.join(path)));

    tracing::debug!(%root, config = ?config, "Opening workspace");
    Ok(Workspace::open(root, config)?)
}
