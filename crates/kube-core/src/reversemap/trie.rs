//! Prefix tree over path segments.

use kube_fs::NormalizedPath;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    children: BTreeMap<String, Node>,
}

impl Node {
    fn absorb(&mut self, other: Node) {
        for (segment, child) in other.children {
            self.children.entry(segment).or_default().absorb(child);
        }
    }
}

/// A trie of inserted paths answering "which inserted path owns this one".
///
/// No end-of-path marker is stored. A node counts as a complete path when
/// it has no children, so a path that is a strict prefix of another
/// inserted path never matches on its own.
///
/// An empty trie matches every query with the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTrie {
    root: Node,
}

impl PathTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path`, creating a node per segment.
    pub fn insert(&mut self, path: &NormalizedPath) {
        let mut node = &mut self.root;
        for segment in path.segments() {
            node = node.children.entry(segment.to_string()).or_default();
        }
    }

    /// The inserted path that `path` lies under, if any.
    ///
    /// Walks `path` from the root and returns the consumed prefix at the
    /// first childless node. Fails when a segment is unknown or when the
    /// query ends on a node that still has children.
    pub fn longest_known(&self, path: &NormalizedPath) -> Option<NormalizedPath> {
        let mut node = &self.root;
        let mut consumed: Vec<&str> = Vec::new();
        let mut segments = path.segments();

        loop {
            if node.children.is_empty() {
                return Some(NormalizedPath::from_segments(&consumed));
            }
            let segment = segments.next()?;
            node = node.children.get(segment)?;
            consumed.push(segment);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Insert every path of `other`.
    pub fn absorb(&mut self, other: PathTrie) {
        self.root.absorb(other.root);
    }
}
