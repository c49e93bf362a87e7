//! Git repository fixtures at two realism levels.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs:
//! fakes are faster and have fewer external dependencies.

use std::fs;
use std::path::Path;

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Realism level: **FAKE**. Directory structure only, no git object store.
///
/// Use for: tests that need a `.git` marker to satisfy workspace-root
/// discovery but never read history.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/main\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
}

/// Initialises a real git repository using `git2` with a committer identity
/// configured locally.
///
/// Realism level: **REAL**. Valid git object store, empty history.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    let repo = git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    });
    {
        let mut config = repo
            .config()
            .unwrap_or_else(|e| panic!("real_git_repo: failed to open config: {e}"));
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@test.com").unwrap();
    }
    repo
}

/// Stage every file of the working tree (additions, modifications and
/// deletions) and commit it on `HEAD`. Returns the new commit id.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &git2::Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("commit_all: failed to stage files: {e}"));
    index
        .update_all(["*"].iter(), None)
        .unwrap_or_else(|e| panic!("commit_all: failed to stage deletions: {e}"));
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = repo.signature().unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: failed to commit: {e}"))
}
