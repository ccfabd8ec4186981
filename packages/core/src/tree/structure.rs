//! Nested Tree Structure
//!
//! The nested counterpart of the flat [`Node`] record: each `TreeNode`
//! owns its record and an ordered list of `Arc`-shared children. Sibling
//! order in this structure is the source of truth for ordering; the flat
//! form carries no explicit order field.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::Node;

/// A node of the reconstructed tree.
///
/// Serializes as the flat record with an added `children` array, which is
/// the shape hosts typically feed straight into their view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// The record in flat form; `parent_id` may be stale inside the nested
    /// structure and is rewritten from the walk on flatten
    #[serde(flatten)]
    pub node: Node,

    /// Ordered children, shared across tree versions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<TreeNode>>,
}

impl TreeNode {
    /// Wrap a record as a leaf.
    pub fn new(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    /// Wrap a record with children.
    pub fn with_children(node: Node, children: Vec<Arc<TreeNode>>) -> Self {
        Self { node, children }
    }

    /// Total number of records in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Whether `id` names this node or any descendant.
    pub fn contains(&self, id: &str) -> bool {
        self.node.id == id || self.children.iter().any(|child| child.contains(id))
    }
}

/// Locate a node by id, depth-first.
///
/// Returns the shared pointer so callers can clone it cheaply or compare
/// identity across tree versions.
pub fn find_node<'a>(root: &'a Arc<TreeNode>, id: &str) -> Option<&'a Arc<TreeNode>> {
    if root.node.id == id {
        return Some(root);
    }
    root.children.iter().find_map(|child| find_node(child, id))
}
