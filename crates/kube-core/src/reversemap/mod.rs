//! Change impact: which rendered units depend on a changed path.

pub mod index;
pub mod reference;
pub mod trie;

pub use index::ResourceIndex;
pub use reference::{ResourceReference, extract_clusters, merge_references};
pub use trie::PathTrie;
