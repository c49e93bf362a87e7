//! Paths changed between a revision and the working tree.

use git2::{DiffOptions, ErrorCode, Repository};
use kube_fs::NormalizedPath;
use std::collections::BTreeSet;

use crate::{Error, Result};

/// Paths that differ between `base` and the working tree of the repository
/// at `repo_root`, relative to the repository root.
///
/// Staged and unstaged changes count, as do untracked files. Both sides of
/// a rename are reported. The result is sorted and free of duplicates.
pub fn changed_paths(repo_root: &NormalizedPath, base: &str) -> Result<Vec<NormalizedPath>> {
    let repo = open(repo_root)?;

    let tree = repo
        .revparse_single(base)
        .and_then(|object| object.peel_to_tree())
        .map_err(|e| Error::RevisionNotFound {
            rev: base.to_string(),
            message: e.message().to_string(),
        })?;

    let mut options = DiffOptions::new();
    options.include_untracked(true).recurse_untracked_dirs(true);

    let mut diff = repo.diff_tree_to_workdir_with_index(Some(&tree), Some(&mut options))?;
    diff.find_similar(None)?;

    let mut paths = BTreeSet::new();
    for delta in diff.deltas() {
        for file in [delta.old_file(), delta.new_file()] {
            if let Some(path) = file.path() {
                paths.insert(NormalizedPath::new(path));
            }
        }
    }

    tracing::debug!(base, changed = paths.len(), "Collected changed paths");
    Ok(paths.into_iter().collect())
}

fn open(repo_root: &NormalizedPath) -> Result<Repository> {
    Repository::open(repo_root.to_native()).map_err(|e| match e.code() {
        ErrorCode::NotFound => Error::NotARepository {
            path: repo_root.to_native(),
        },
        _ => Error::Git(e),
    })
}
