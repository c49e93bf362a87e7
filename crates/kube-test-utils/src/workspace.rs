//! [`TestWorkspace`] builder for override-tree test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace directory with helpers to lay out services,
/// override files, cluster definitions and the workspace configuration.
///
/// The directory carries a `.git` marker so root discovery stops there.
///
/// # Example
///
/// ```rust,no_run
/// use kube_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// ws.write("k8s/services/snuba/_values.yaml", "workers: 2\n");
/// ws.write_cluster("k8s/clusters/saas", "pop", &["k8s/services/*"], "");
/// ws.assert_file_exists("k8s/services/snuba/_values.yaml");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty workspace with a `.git` marker directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        crate::git::fake_git_dir(temp_dir.path());
        Self { temp_dir }
    }

    /// Root path of the workspace.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("TestWorkspace::write: failed to create {parent:?}: {e}"));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestWorkspace::write: failed to write {path:?}: {e}"));
        path
    }

    /// Create the directory `rel` (and its parents).
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("TestWorkspace::mkdir: failed to create {path:?}: {e}"));
        path
    }

    /// Make `link` a symlink to the directory `target` (both relative).
    #[cfg(unix)]
    pub fn symlink_dir(&self, target: &str, link: &str) {
        let link_path = self.root().join(link);
        if let Some(parent) = link_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        std::os::unix::fs::symlink(self.root().join(target), &link_path)
            .unwrap_or_else(|e| panic!("TestWorkspace::symlink_dir: failed to link {link_path:?}: {e}"));
    }

    /// Write the workspace configuration at its default location.
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        self.write("cli_config/configuration.yaml", yaml)
    }

    /// Write a cluster definition `<dir>/<name>.yaml` listing `services`,
    /// followed by `extra` YAML (cluster data, helm section).
    pub fn write_cluster(&self, dir: &str, name: &str, services: &[&str], extra: &str) -> PathBuf {
        let mut doc = String::from("services:\n");
        for service in services {
            doc.push_str(&format!("  - {service}\n"));
        }
        doc.push_str(extra);
        self.write(&format!("{dir}/{name}.yaml"), &doc)
    }

    /// Assert that `rel` exists under the workspace root.
    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.root().join(rel);
        assert!(path.exists(), "expected {rel} to exist at {path:?}");
    }
}
