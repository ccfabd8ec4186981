//! Immutable Tree Editor
//!
//! Every operation here takes a shared tree and returns a new one: only
//! the nodes on the path from the root to the edited node are fresh
//! allocations, every untouched subtree keeps its `Arc` identity. Callers
//! rely on pointer inequality to detect what changed.
//!
//! Operations targeting an id that does not exist anywhere in the tree are
//! silent no-ops — the *same* root pointer comes back and a `debug!` event
//! is emitted. Losing in-progress editor content to a strict failure would
//! cost more than ignoring a stale id.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{MediaAttachment, MediaPosition, Node, NodePatch, Note};
use crate::tree::structure::{find_node, TreeNode};

/// Label given to nodes created through [`add_child`].
pub const DEFAULT_CHILD_LABEL: &str = "New topic";

/// Rebuild the path from `node` down to `target_id`, applying `edit` to
/// the target. Returns `None` when the target is absent from this subtree;
/// sibling subtrees keep their `Arc` identity.
pub(crate) fn rewrite_at(
    node: &Arc<TreeNode>,
    target_id: &str,
    edit: &mut dyn FnMut(&TreeNode) -> TreeNode,
) -> Option<Arc<TreeNode>> {
    if node.node.id == target_id {
        return Some(Arc::new(edit(node)));
    }
    for (i, child) in node.children.iter().enumerate() {
        if let Some(rewritten) = rewrite_at(child, target_id, edit) {
            let mut children = node.children.clone();
            children[i] = rewritten;
            return Some(Arc::new(TreeNode {
                node: node.node.clone(),
                children,
            }));
        }
    }
    None
}

/// Merge a patch into the node named by `target_id`.
///
/// Refreshes the target's `modified_at`. Copy-on-path: subtrees off the
/// path to the target are reference-identical in the result.
///
/// # Examples
///
/// ```rust
/// use mindgraph_core::models::{Node, NodePatch};
/// use mindgraph_core::tree::{build_tree, update_node};
///
/// let tree = build_tree(vec![Node::new_with_id("r".to_string(), "Root".to_string(), None)]).unwrap();
/// let renamed = update_node(&tree, "r", &NodePatch::new().with_label("Renamed".to_string()));
/// assert_eq!(renamed.node.label, "Renamed");
/// assert_eq!(tree.node.label, "Root"); // original untouched
/// ```
pub fn update_node(root: &Arc<TreeNode>, target_id: &str, patch: &NodePatch) -> Arc<TreeNode> {
    let mut edit = |current: &TreeNode| {
        let mut node = current.node.clone();
        node.apply_patch(patch);
        TreeNode {
            node,
            children: current.children.clone(),
        }
    };
    match rewrite_at(root, target_id, &mut edit) {
        Some(new_root) => new_root,
        None => {
            tracing::debug!(target_id, "update target not found, tree unchanged");
            Arc::clone(root)
        }
    }
}

/// Flip the collapsed flag of the node named by `target_id`.
pub fn toggle_collapsed(root: &Arc<TreeNode>, target_id: &str) -> Arc<TreeNode> {
    let Some(target) = find_node(root, target_id) else {
        tracing::debug!(target_id, "collapse target not found, tree unchanged");
        return Arc::clone(root);
    };
    let next = !target.node.collapsed;
    update_node(root, target_id, &NodePatch::new().with_collapsed(next))
}

/// Append a freshly generated child under `parent_id`.
///
/// The new node gets a UUID, the default label and color, and starts
/// expanded. The parent's own collapsed flag is forced off so the new
/// child is visible immediately.
pub fn add_child(root: &Arc<TreeNode>, parent_id: &str) -> Arc<TreeNode> {
    add_child_with(
        root,
        parent_id,
        Node::new(DEFAULT_CHILD_LABEL.to_string(), Some(parent_id.to_string())),
    )
}

/// Append a caller-constructed child under `parent_id`.
///
/// Covers hosts that pre-assign ids for optimistic tracking. The child's
/// `parent_id` is normalized to the named parent; the same
/// collapsed-clearing rule as [`add_child`] applies.
pub fn add_child_with(root: &Arc<TreeNode>, parent_id: &str, mut child: Node) -> Arc<TreeNode> {
    child.parent_id = Some(parent_id.to_string());
    let mut edit = |parent: &TreeNode| {
        let mut node = parent.node.clone();
        node.collapsed = false;
        let mut children = parent.children.clone();
        children.push(Arc::new(TreeNode::new(child.clone())));
        TreeNode { node, children }
    };
    match rewrite_at(root, parent_id, &mut edit) {
        Some(new_root) => new_root,
        None => {
            tracing::debug!(parent_id, "insert parent not found, tree unchanged");
            Arc::clone(root)
        }
    }
}

/// Remove the node named by `target_id` together with its whole subtree.
///
/// Deleting the root clears the tree (`None`). Children are never
/// reparented — the subtree is discarded as a unit. A missing target is a
/// silent no-op returning the same root.
pub fn delete_node(root: &Arc<TreeNode>, target_id: &str) -> Option<Arc<TreeNode>> {
    if root.node.id == target_id {
        return None;
    }
    match remove_at(root, target_id) {
        Some(new_root) => Some(new_root),
        None => {
            tracing::debug!(target_id, "delete target not found, tree unchanged");
            Some(Arc::clone(root))
        }
    }
}

fn remove_at(node: &Arc<TreeNode>, target_id: &str) -> Option<Arc<TreeNode>> {
    if let Some(pos) = node.children.iter().position(|c| c.node.id == target_id) {
        let mut children = node.children.clone();
        children.remove(pos);
        return Some(Arc::new(TreeNode {
            node: node.node.clone(),
            children,
        }));
    }
    for (i, child) in node.children.iter().enumerate() {
        if let Some(rewritten) = remove_at(child, target_id) {
            let mut children = node.children.clone();
            children[i] = rewritten;
            return Some(Arc::new(TreeNode {
                node: node.node.clone(),
                children,
            }));
        }
    }
    None
}

/// Append a note to the node named by `target_id`.
pub fn add_note(root: &Arc<TreeNode>, target_id: &str, note: Note) -> Arc<TreeNode> {
    let mut edit = |current: &TreeNode| {
        let mut node = current.node.clone();
        node.notes.push(note.clone());
        node.modified_at = Utc::now();
        TreeNode {
            node,
            children: current.children.clone(),
        }
    };
    match rewrite_at(root, target_id, &mut edit) {
        Some(new_root) => new_root,
        None => {
            tracing::debug!(target_id, "note target not found, tree unchanged");
            Arc::clone(root)
        }
    }
}

/// Replace a note (matched by `note.id`) on the node named by `target_id`.
///
/// The note keeps its position in the list; notes are never reordered
/// implicitly. No-op when the node or the note id is missing.
pub fn edit_note(root: &Arc<TreeNode>, target_id: &str, note: Note) -> Arc<TreeNode> {
    let Some(target) = find_node(root, target_id) else {
        tracing::debug!(target_id, "note target not found, tree unchanged");
        return Arc::clone(root);
    };
    if !target.node.notes.iter().any(|n| n.id == note.id) {
        tracing::debug!(target_id, note_id = %note.id, "note not found, tree unchanged");
        return Arc::clone(root);
    }

    let mut edit = |current: &TreeNode| {
        let mut node = current.node.clone();
        if let Some(slot) = node.notes.iter_mut().find(|n| n.id == note.id) {
            *slot = note.clone();
        }
        node.modified_at = Utc::now();
        TreeNode {
            node,
            children: current.children.clone(),
        }
    };
    rewrite_at(root, target_id, &mut edit).unwrap_or_else(|| Arc::clone(root))
}

/// Remove a note by id from the node named by `target_id`.
pub fn delete_note(root: &Arc<TreeNode>, target_id: &str, note_id: &str) -> Arc<TreeNode> {
    let Some(target) = find_node(root, target_id) else {
        tracing::debug!(target_id, "note target not found, tree unchanged");
        return Arc::clone(root);
    };
    if !target.node.notes.iter().any(|n| n.id == note_id) {
        tracing::debug!(target_id, note_id, "note not found, tree unchanged");
        return Arc::clone(root);
    }

    let mut edit = |current: &TreeNode| {
        let mut node = current.node.clone();
        node.notes.retain(|n| n.id != note_id);
        node.modified_at = Utc::now();
        TreeNode {
            node,
            children: current.children.clone(),
        }
    };
    rewrite_at(root, target_id, &mut edit).unwrap_or_else(|| Arc::clone(root))
}

/// Attach (or replace) the media attachment of the node named by
/// `target_id`. The engine stores the locator and layout metadata only;
/// uploading happened elsewhere.
pub fn attach_media(root: &Arc<TreeNode>, target_id: &str, media: MediaAttachment) -> Arc<TreeNode> {
    update_node(root, target_id, &NodePatch::new().with_media(media))
}

/// Detach the media attachment of the node named by `target_id`.
/// No-op when the node has no attachment.
pub fn detach_media(root: &Arc<TreeNode>, target_id: &str) -> Arc<TreeNode> {
    let Some(target) = find_node(root, target_id) else {
        tracing::debug!(target_id, "media target not found, tree unchanged");
        return Arc::clone(root);
    };
    if target.node.media.is_none() {
        return Arc::clone(root);
    }
    update_node(
        root,
        target_id,
        &NodePatch {
            media: Some(None),
            ..Default::default()
        },
    )
}

/// Reposition the media attachment of the node named by `target_id`.
/// No-op when the node has no attachment.
pub fn set_media_position(
    root: &Arc<TreeNode>,
    target_id: &str,
    position: MediaPosition,
) -> Arc<TreeNode> {
    let Some(target) = find_node(root, target_id) else {
        tracing::debug!(target_id, "media target not found, tree unchanged");
        return Arc::clone(root);
    };
    let Some(media) = &target.node.media else {
        tracing::debug!(target_id, "no media attached, tree unchanged");
        return Arc::clone(root);
    };
    let mut repositioned = media.clone();
    repositioned.position = position;
    update_node(root, target_id, &NodePatch::new().with_media(repositioned))
}

/// Reparent the subtree rooted at `node_id` under `new_parent_id`,
/// appended after the destination's existing children.
///
/// No-op when either id is missing, when the node is the root, when the
/// destination lies inside the moved subtree (would create a cycle), or
/// when the node already sits directly under the destination. The
/// destination's collapsed flag is cleared so the moved subtree is
/// visible immediately.
pub fn move_node(root: &Arc<TreeNode>, node_id: &str, new_parent_id: &str) -> Arc<TreeNode> {
    if node_id == new_parent_id || root.node.id == node_id {
        tracing::debug!(node_id, "move rejected: root or self-destination");
        return Arc::clone(root);
    }
    let subtree = match find_node(root, node_id) {
        Some(found) => Arc::clone(found),
        None => {
            tracing::debug!(node_id, "move source not found, tree unchanged");
            return Arc::clone(root);
        }
    };
    if subtree.contains(new_parent_id) {
        tracing::debug!(
            node_id,
            new_parent_id,
            "move rejected: destination inside moved subtree"
        );
        return Arc::clone(root);
    }
    let Some(dest) = find_node(root, new_parent_id) else {
        tracing::debug!(new_parent_id, "move destination not found, tree unchanged");
        return Arc::clone(root);
    };
    if dest.children.iter().any(|c| c.node.id == node_id) {
        return Arc::clone(root);
    }

    let Some(detached) = remove_at(root, node_id) else {
        return Arc::clone(root);
    };

    let mut moved = (*subtree).clone();
    moved.node.parent_id = Some(new_parent_id.to_string());
    let moved = Arc::new(moved);

    let mut edit = |parent: &TreeNode| {
        let mut node = parent.node.clone();
        node.collapsed = false;
        let mut children = parent.children.clone();
        children.push(Arc::clone(&moved));
        TreeNode { node, children }
    };
    rewrite_at(&detached, new_parent_id, &mut edit).unwrap_or_else(|| Arc::clone(root))
}

/// Assign fresh UUIDs to every node and note in the tree, preserving
/// structure and payload.
///
/// Externally generated trees pass through here before flattening so
/// their identifiers cannot collide with anything the caller already
/// stores.
pub fn rekey_tree(root: &Arc<TreeNode>) -> Arc<TreeNode> {
    fn rekey(node: &TreeNode, parent_id: Option<&str>) -> Arc<TreeNode> {
        let new_id = Uuid::new_v4().to_string();
        let mut record = node.node.clone();
        record.id = new_id.clone();
        record.parent_id = parent_id.map(str::to_string);
        for note in &mut record.notes {
            note.id = Uuid::new_v4().to_string();
        }
        let children = node
            .children
            .iter()
            .map(|child| rekey(child, Some(new_id.as_str())))
            .collect();
        Arc::new(TreeNode {
            node: record,
            children,
        })
    }
    rekey(root, None)
}
