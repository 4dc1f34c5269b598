//! The 16-way radix trie holding ledger state and transactions.
//!
//! Nodes are content-addressed: an inner node hashes its sixteen child
//! hashes, a leaf hashes its item and index. Nodes live in a [`NodeStore`]
//! keyed by those hashes, so two tries sharing a store share every subtree
//! they have in common.

pub mod builder;
pub mod diff;
pub mod node;
pub mod store;
pub mod traverse;

pub use builder::{BuiltTrie, TrieBuilder};
pub use diff::{diff, Action, DiffEntry};
pub use node::{fetch_node, InnerNode, LeafNode, Node, NodeKind, BRANCHES};
pub use store::{MemoryNodeStore, NodeHeader, NodeStore, NodeType};
pub use traverse::{fill, find_leaf, leaves, walk, FilledNode};
