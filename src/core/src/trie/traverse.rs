//! Reading a trie back out of a node store.

use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::trie::node::{fetch_node, LeafNode, Node};
use crate::trie::store::NodeStore;
use tracing::debug;

/// A node resolved from the store, with where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledNode {
    pub depth: usize,
    pub hash: Hash256,
    pub node: Node,
}

/// Visits the subtree under `hash` in pre-order, starting at `depth`.
///
/// Stops at the visitor's first error and returns it.
pub(crate) fn visit<F>(
    store: &dyn NodeStore,
    hash: &Hash256,
    depth: usize,
    visitor: &mut F,
) -> Result<(), CoreError>
where
    F: FnMut(usize, &Hash256, &Node) -> Result<(), CoreError>,
{
    if hash.is_zero() {
        return Ok(());
    }
    let node = fetch_node(store, hash)?;
    visitor(depth, hash, &node)?;
    if let Node::Inner(inner) = &node {
        for child in inner.children.iter().filter(|c| !c.is_zero()) {
            visit(store, child, depth + 1, visitor)?;
        }
    }
    Ok(())
}

/// Resolves every node under `root`, in pre-order.
pub fn fill(store: &dyn NodeStore, root: &Hash256) -> Result<Vec<FilledNode>, CoreError> {
    let mut nodes = Vec::new();
    visit(store, root, 0, &mut |depth, hash, node| {
        nodes.push(FilledNode {
            depth,
            hash: *hash,
            node: node.clone(),
        });
        Ok(())
    })?;
    debug!("Filled {} nodes under {}", nodes.len(), root);
    Ok(nodes)
}

/// Calls `visitor(depth, node)` on every node under `root`, in pre-order.
pub fn walk<F>(store: &dyn NodeStore, root: &Hash256, mut visitor: F) -> Result<(), CoreError>
where
    F: FnMut(usize, &Node) -> Result<(), CoreError>,
{
    visit(store, root, 0, &mut |depth, _, node| visitor(depth, node))
}

/// Every leaf under `root`, in index order.
pub fn leaves(store: &dyn NodeStore, root: &Hash256) -> Result<Vec<LeafNode>, CoreError> {
    let mut out = Vec::new();
    walk(store, root, |_, node| {
        if let Node::Leaf(leaf) = node {
            out.push(leaf.clone());
        }
        Ok(())
    })?;
    Ok(out)
}

/// Follows `index`'s nibble path from `root` to its leaf.
pub fn find_leaf(
    store: &dyn NodeStore,
    root: &Hash256,
    index: &Hash256,
) -> Result<Option<LeafNode>, CoreError> {
    let mut hash = *root;
    let mut depth = 0;
    while !hash.is_zero() {
        match fetch_node(store, &hash)? {
            Node::Leaf(leaf) => {
                return Ok(if leaf.index == *index { Some(leaf) } else { None });
            }
            Node::Inner(inner) => {
                if depth >= 64 {
                    return Err(CoreError::CorruptNode {
                        hash,
                        reason: "inner node below the last nibble".to_string(),
                    });
                }
                hash = inner.child(index.nibble(depth));
                depth += 1;
            }
        }
    }
    Ok(None)
}
