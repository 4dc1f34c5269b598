//! Differences between two tries sharing a node store.

use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::trie::node::{fetch_node, Node};
use crate::trie::store::NodeStore;
use crate::trie::traverse::visit;
use std::fmt;
use tracing::debug;

/// Whether a node left or joined the tree. Additions sort after deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Deletion,
    Addition,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Deletion => f.write_str("-"),
            Action::Addition => f.write_str("+"),
        }
    }
}

/// One node present on only one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub action: Action,
    pub depth: usize,
    pub node: Node,
}

/// The nodes that must be removed from `left` and added to reach `right`.
///
/// Additions come first, then deletions; within each, shallower nodes come
/// first, and the order is otherwise the pre-order in which they were found.
pub fn diff(
    store: &dyn NodeStore,
    left: &Hash256,
    right: &Hash256,
) -> Result<Vec<DiffEntry>, CoreError> {
    let mut out = Vec::new();
    diff_at(store, 0, left, right, &mut out)?;
    out.sort_by(|a, b| b.action.cmp(&a.action).then(a.depth.cmp(&b.depth)));
    debug!("Diff {} -> {}: {} nodes", left, right, out.len());
    Ok(out)
}

fn whole(
    store: &dyn NodeStore,
    action: Action,
    depth: usize,
    hash: &Hash256,
    out: &mut Vec<DiffEntry>,
) -> Result<(), CoreError> {
    visit(store, hash, depth, &mut |depth, _, node| {
        out.push(DiffEntry {
            action,
            depth,
            node: node.clone(),
        });
        Ok(())
    })
}

fn children(
    store: &dyn NodeStore,
    action: Action,
    depth: usize,
    node: &Node,
    out: &mut Vec<DiffEntry>,
) -> Result<(), CoreError> {
    if let Node::Inner(inner) = node {
        for child in &inner.children {
            whole(store, action, depth + 1, child, out)?;
        }
    }
    Ok(())
}

fn diff_at(
    store: &dyn NodeStore,
    depth: usize,
    left: &Hash256,
    right: &Hash256,
    out: &mut Vec<DiffEntry>,
) -> Result<(), CoreError> {
    if left == right {
        return Ok(());
    }
    if left.is_zero() {
        return whole(store, Action::Addition, depth, right, out);
    }
    if right.is_zero() {
        return whole(store, Action::Deletion, depth, left, out);
    }

    let old = fetch_node(store, left)?;
    let new = fetch_node(store, right)?;
    out.push(DiffEntry {
        action: Action::Deletion,
        depth,
        node: old.clone(),
    });
    out.push(DiffEntry {
        action: Action::Addition,
        depth,
        node: new.clone(),
    });

    match (&old, &new) {
        (Node::Inner(a), Node::Inner(b)) => {
            for (l, r) in a.children.iter().zip(b.children.iter()) {
                diff_at(store, depth + 1, l, r, out)?;
            }
        }
        (Node::Leaf(_), _) => children(store, Action::Addition, depth, &new, out)?,
        (_, Node::Leaf(_)) => children(store, Action::Deletion, depth, &old, out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::builder::TrieBuilder;
    use crate::trie::node::{LeafNode, NodeKind};
    use crate::trie::store::MemoryNodeStore;

    fn leaf(first: u8, value: u8) -> LeafNode {
        let mut index = [0u8; 32];
        index[0] = first;
        LeafNode::new(NodeKind::State, Hash256(index), vec![value])
    }

    fn flush(store: &MemoryNodeStore, leaves: &[LeafNode]) -> Hash256 {
        let mut builder = TrieBuilder::new(NodeKind::State);
        for l in leaves {
            builder.insert(l.clone()).unwrap();
        }
        builder.flush(store, 1).unwrap()
    }

    #[test]
    fn test_equal_and_empty() {
        let store = MemoryNodeStore::new();
        let root = flush(&store, &[leaf(0x10, 1)]);
        assert!(diff(&store, &root, &root).unwrap().is_empty());
        assert!(diff(&store, &Hash256::zero(), &Hash256::zero()).unwrap().is_empty());

        let added = diff(&store, &Hash256::zero(), &root).unwrap();
        assert_eq!(added.len(), 2);
        assert!(added.iter().all(|e| e.action == Action::Addition));
        assert_eq!(added[0].depth, 0);
        assert_eq!(added[1].depth, 1);

        let removed = diff(&store, &root, &Hash256::zero()).unwrap();
        assert!(removed.iter().all(|e| e.action == Action::Deletion));
    }

    #[test]
    fn test_changed_leaf() {
        let store = MemoryNodeStore::new();
        let before = flush(&store, &[leaf(0x10, 1), leaf(0x20, 2)]);
        let after = flush(&store, &[leaf(0x10, 1), leaf(0x20, 3)]);
        let entries = diff(&store, &before, &after).unwrap();
        let summary: Vec<(Action, usize)> = entries.iter().map(|e| (e.action, e.depth)).collect();
        assert_eq!(
            summary,
            vec![
                (Action::Addition, 0),
                (Action::Addition, 1),
                (Action::Deletion, 0),
                (Action::Deletion, 1),
            ]
        );
        assert_eq!(entries[1].node, Node::Leaf(leaf(0x20, 3)));
        assert_eq!(entries[3].node, Node::Leaf(leaf(0x20, 2)));
    }

    #[test]
    fn test_leaf_replaced_by_subtree() {
        let store = MemoryNodeStore::new();
        let before = flush(&store, &[leaf(0x10, 1), leaf(0x20, 2)]);
        let after = flush(&store, &[leaf(0x10, 1), leaf(0x20, 2), leaf(0x21, 4)]);
        let entries = diff(&store, &before, &after).unwrap();
        let additions: Vec<usize> = entries
            .iter()
            .filter(|e| e.action == Action::Addition)
            .map(|e| e.depth)
            .collect();
        // New root, new inner at depth 1, both leaves under it at depth 2.
        assert_eq!(additions, vec![0, 1, 2, 2]);
        let deletions: Vec<usize> = entries
            .iter()
            .filter(|e| e.action == Action::Deletion)
            .map(|e| e.depth)
            .collect();
        assert_eq!(deletions, vec![0, 1]);
    }

    #[test]
    fn test_deterministic() {
        let store = MemoryNodeStore::new();
        let before = flush(&store, &[leaf(0x10, 1), leaf(0x35, 2), leaf(0x36, 7)]);
        let after = flush(&store, &[leaf(0x10, 9), leaf(0x36, 7), leaf(0xA0, 0)]);
        assert_eq!(
            diff(&store, &before, &after).unwrap(),
            diff(&store, &before, &after).unwrap()
        );
    }
}
