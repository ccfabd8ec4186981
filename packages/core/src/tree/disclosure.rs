//! Progressive Disclosure
//!
//! Restricted (read-only) viewing reveals the tree strictly one level at a
//! time: on load only the root and its direct children are visible, and
//! expanding a node simultaneously re-collapses that node's own children.
//!
//! All transitions are pure functions over a *display* tree; the caller's
//! stored tree (and its stored collapsed values) is never mutated. Only
//! editor-mode toggles, which flow through the patch path, count as
//! content edits.

use std::sync::Arc;

use crate::tree::editor::{self, rewrite_at};
use crate::tree::structure::{find_node, TreeNode};

/// Viewing mode for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Structural edits allowed; collapse toggles are free-form
    #[default]
    Editor,
    /// Read-only; disclosure is forced one level at a time
    Restricted,
}

/// Prepare a tree for first render in restricted mode: the root is forced
/// expanded and every node at depth ≥ 1 is forced collapsed, regardless of
/// stored values. A viewer never sees more than one level below the root
/// on first render.
pub fn apply_initial_disclosure(root: &Arc<TreeNode>) -> Arc<TreeNode> {
    fn walk(node: &Arc<TreeNode>, depth: usize) -> Arc<TreeNode> {
        let mut record = node.node.clone();
        record.collapsed = depth >= 1;
        let children = node.children.iter().map(|c| walk(c, depth + 1)).collect();
        Arc::new(TreeNode {
            node: record,
            children,
        })
    }
    walk(root, 0)
}

/// Restricted-mode expand: uncollapse the target and simultaneously force
/// each of its direct children collapsed, so drilling down never shows two
/// open levels below the focused node.
pub fn expand(root: &Arc<TreeNode>, target_id: &str) -> Arc<TreeNode> {
    let mut edit = |current: &TreeNode| {
        let mut record = current.node.clone();
        record.collapsed = false;
        let children = current
            .children
            .iter()
            .map(|child| {
                let mut child_record = child.node.clone();
                child_record.collapsed = true;
                Arc::new(TreeNode {
                    node: child_record,
                    children: child.children.clone(),
                })
            })
            .collect();
        TreeNode {
            node: record,
            children,
        }
    };
    match rewrite_at(root, target_id, &mut edit) {
        Some(new_root) => new_root,
        None => {
            tracing::debug!(target_id, "expand target not found, tree unchanged");
            Arc::clone(root)
        }
    }
}

/// Restricted-mode collapse: re-collapse the target. Its children are
/// already collapsed by the expand invariant, so nothing else moves.
pub fn collapse(root: &Arc<TreeNode>, target_id: &str) -> Arc<TreeNode> {
    let mut edit = |current: &TreeNode| {
        let mut record = current.node.clone();
        record.collapsed = true;
        TreeNode {
            node: record,
            children: current.children.clone(),
        }
    };
    match rewrite_at(root, target_id, &mut edit) {
        Some(new_root) => new_root,
        None => {
            tracing::debug!(target_id, "collapse target not found, tree unchanged");
            Arc::clone(root)
        }
    }
}

/// Per-session disclosure state: owns the [`ViewMode`] and routes toggles
/// to the matching transition.
///
/// # Examples
///
/// ```rust
/// use mindgraph_core::models::Node;
/// use mindgraph_core::tree::{build_tree, DisclosureController, ViewMode};
///
/// let tree = build_tree(vec![
///     Node::new_with_id("r".to_string(), "Root".to_string(), None),
///     Node::new_with_id("a".to_string(), "Topic".to_string(), Some("r".to_string())),
///     Node::new_with_id("b".to_string(), "Sub".to_string(), Some("a".to_string())),
/// ])
/// .unwrap();
///
/// let viewer = DisclosureController::new(ViewMode::Restricted);
/// let display = viewer.initialize(&tree);
/// assert!(display.children[0].node.collapsed); // depth 1 starts hidden
/// ```
#[derive(Debug, Clone, Default)]
pub struct DisclosureController {
    mode: ViewMode,
}

impl DisclosureController {
    /// Create a controller for the given mode.
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    /// The session's viewing mode.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Prepare a display tree for first render. Editor mode passes the
    /// tree through untouched.
    pub fn initialize(&self, root: &Arc<TreeNode>) -> Arc<TreeNode> {
        match self.mode {
            ViewMode::Restricted => apply_initial_disclosure(root),
            ViewMode::Editor => Arc::clone(root),
        }
    }

    /// Toggle the node named by `target_id`.
    ///
    /// Editor mode flips the stored flag freely; restricted mode routes to
    /// [`expand`]/[`collapse`] so the one-level-at-a-time invariant holds.
    pub fn toggle(&self, root: &Arc<TreeNode>, target_id: &str) -> Arc<TreeNode> {
        match self.mode {
            ViewMode::Editor => editor::toggle_collapsed(root, target_id),
            ViewMode::Restricted => match find_node(root, target_id) {
                Some(target) if target.node.collapsed => expand(root, target_id),
                Some(_) => collapse(root, target_id),
                None => {
                    tracing::debug!(target_id, "toggle target not found, tree unchanged");
                    Arc::clone(root)
                }
            },
        }
    }
}
