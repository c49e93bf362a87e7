//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Workspace-relative paths are compared segment by segment (reverse index,
/// changesets), so the internal form never carries backslashes, empty
/// segments, `.` segments or a `..` that could be folded away. Conversion
/// to a platform-native path only happens at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes, collapses repeated
    /// separators, drops `.` segments and folds `..` into its parent.
    /// A leading `/` is kept; `..` above a relative start is kept too.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy().replace('\\', "/");
        let absolute = path_str.starts_with('/');
        let mut segments: Vec<&str> = Vec::new();
        for segment in path_str.split('/') {
            match segment {
                "" | "." => {}
                ".." => match segments.last() {
                    Some(&last) if last != ".." => {
                        segments.pop();
                    }
                    _ if absolute => {}
                    _ => segments.push(".."),
                },
                _ => segments.push(segment),
            }
        }
        let body = segments.join("/");
        let inner = if absolute { format!("/{body}") } else { body };
        Self { inner }
    }

    /// The empty relative path. Displays as an empty string.
    pub fn empty() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Build a relative path from its segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let joined = segments
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("/");
        Self::new(joined)
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether this is the empty relative path.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Whether the path starts at the filesystem root.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || Path::new(&self.inner).is_absolute()
    }

    /// Path segments in order, without separators.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment (or a relative multi-segment path).
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(0) => None,
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None if !self.inner.is_empty() => Some(Self::empty()),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Strip `base` from the front of this path, segment-wise.
    ///
    /// Returns `None` when `base` is not a prefix of this path. Stripping a
    /// path from itself yields the empty path.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        if self.is_absolute() != base.is_absolute() {
            return None;
        }
        let mut own = self.segments();
        for expected in base.segments() {
            if own.next() != Some(expected) {
                return None;
            }
        }
        Some(Self::from_segments(&own.collect::<Vec<_>>()))
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
