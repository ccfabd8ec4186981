//! Tree Builder / Flattener
//!
//! Converts a flat list of [`Node`] records (unordered, referencing each
//! other by parent id) into a single rooted nested structure, and back.
//!
//! # Behavior
//!
//! - Records are indexed by id; each record is attached as a child of the
//!   record its `parent_id` names, in input encounter order
//! - A record whose parent is absent from the set is treated as an orphan
//!   (defensive handling, not an error path); the first orphan encountered
//!   becomes the designated root
//! - What happens to *additional* orphans is an explicit choice: see
//!   [`OrphanPolicy`]
//! - Flattening walks depth-first pre-order and rewrites `parent_id` from
//!   the walk, so build/flatten round-trips are order-stable
//!
//! Reconstruction favors availability over strict validation — a broken
//! reference must not make the whole tree unrenderable. Callers that want
//! diagnostics instead use [`validate_records`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::Node;
use crate::tree::error::TreeError;
use crate::tree::structure::TreeNode;

/// Strategy for records with no resolvable parent beyond the first.
///
/// The first such record always becomes the root; this policy governs the
/// rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Keep only the first orphan as root; drop the others from the nested
    /// structure (they stay in the caller's flat list but are unreachable
    /// after a round-trip)
    #[default]
    FirstRootWins,
    /// Append extra orphans (with their subtrees) to the root's children
    AdoptUnderRoot,
    /// Refuse the input with [`TreeError::AmbiguousRoot`]
    Reject,
}

/// Configurable reconstruction of a nested tree from flat records.
///
/// # Examples
///
/// ```rust
/// use mindgraph_core::models::Node;
/// use mindgraph_core::tree::{OrphanPolicy, TreeBuilder};
///
/// let records = vec![
///     Node::new_with_id("r".to_string(), "Root".to_string(), None),
///     Node::new_with_id("a".to_string(), "Topic".to_string(), Some("r".to_string())),
/// ];
///
/// let tree = TreeBuilder::new()
///     .with_orphan_policy(OrphanPolicy::Reject)
///     .build(records)
///     .unwrap()
///     .unwrap();
/// assert_eq!(tree.node.id, "r");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    policy: OrphanPolicy,
}

impl TreeBuilder {
    /// Create a builder with the default orphan policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the orphan policy.
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reconstruct the nested tree.
    ///
    /// Returns `Ok(None)` for an empty input set, and also when no root
    /// candidate exists because every record names a resolvable parent
    /// (a pure parent cycle — surfaced strictly by [`validate_records`]).
    ///
    /// # Errors
    ///
    /// Only `OrphanPolicy::Reject` produces an error, when more than one
    /// record has no resolvable parent.
    pub fn build(&self, records: Vec<Node>) -> Result<Option<Arc<TreeNode>>, TreeError> {
        if records.is_empty() {
            return Ok(None);
        }

        let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

        // parent id -> child record indices, in input encounter order
        let mut children_of: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut orphans: Vec<usize> = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let resolvable = record
                .parent_id
                .as_deref()
                .filter(|parent| *parent != record.id && ids.contains(parent));
            match resolvable {
                Some(parent) => children_of.entry(parent).or_default().push(idx),
                None => {
                    if record.parent_id.is_some() {
                        tracing::warn!(
                            id = %record.id,
                            "dangling parent reference, treating record as orphan"
                        );
                    }
                    orphans.push(idx);
                }
            }
        }

        let Some((&root_idx, extra)) = orphans.split_first() else {
            tracing::warn!("no root candidate: records form a parent cycle");
            return Ok(None);
        };

        if !extra.is_empty() {
            match self.policy {
                OrphanPolicy::Reject => return Err(TreeError::ambiguous_root(orphans.len())),
                OrphanPolicy::AdoptUnderRoot => {
                    children_of
                        .entry(records[root_idx].id.as_str())
                        .or_default()
                        .extend(extra.iter().copied());
                }
                OrphanPolicy::FirstRootWins => {
                    for &idx in extra {
                        tracing::warn!(id = %records[idx].id, "extra orphan root dropped from tree");
                    }
                }
            }
        }

        let mut attached = vec![false; records.len()];
        let root = attach(root_idx, &records, &children_of, &mut attached);

        let reachable = attached.iter().filter(|seen| **seen).count();
        if reachable < records.len() {
            tracing::warn!(
                dropped = records.len() - reachable,
                "records unreachable from the root were dropped"
            );
        }

        Ok(Some(root))
    }
}

/// Recursively attach a record and its children.
///
/// The `attached` mask guards against pathological inputs (duplicate ids
/// can otherwise alias child lists into a loop).
fn attach(
    idx: usize,
    records: &[Node],
    children_of: &HashMap<&str, Vec<usize>>,
    attached: &mut [bool],
) -> Arc<TreeNode> {
    attached[idx] = true;
    let node = records[idx].clone();

    let mut children = Vec::new();
    if let Some(kids) = children_of.get(node.id.as_str()) {
        for &child in kids {
            if !attached[child] {
                children.push(attach(child, records, children_of, attached));
            }
        }
    }

    Arc::new(TreeNode { node, children })
}

/// Reconstruct a nested tree with the default orphan policy.
///
/// Returns `None` only when no tree can be formed (empty input, or no root
/// candidate). Never fails: dangling references are skipped, extra orphans
/// are dropped (first root wins).
pub fn build_tree(records: Vec<Node>) -> Option<Arc<TreeNode>> {
    // FirstRootWins never errors
    TreeBuilder::new().build(records).unwrap_or_default()
}

/// Flatten a nested tree back to records, depth-first pre-order.
///
/// Each node is emitted before its descendants with `parent_id` rewritten
/// from the walk (the root gets `None`), so the nested sibling order
/// round-trips through build/flatten unchanged.
pub fn flatten_tree(root: &Arc<TreeNode>) -> Vec<Node> {
    let mut out = Vec::with_capacity(root.node_count());
    flatten_into(root, None, &mut out);
    out
}

fn flatten_into(node: &Arc<TreeNode>, parent_id: Option<&str>, out: &mut Vec<Node>) {
    let mut record = node.node.clone();
    record.parent_id = parent_id.map(str::to_string);
    out.push(record);
    for child in &node.children {
        flatten_into(child, Some(&node.node.id), out);
    }
}

/// Strictly validate a flat record set.
///
/// The opt-in counterpart of the best-effort builder: reports the problems
/// `build_tree` silently works around.
///
/// # Errors
///
/// - [`TreeError::DuplicateId`] — two records share an id
/// - [`TreeError::DanglingParent`] — a `parent_id` does not resolve
/// - [`TreeError::MissingRoot`] / [`TreeError::AmbiguousRoot`] — not
///   exactly one record without `parent_id` (non-empty sets only)
/// - [`TreeError::CircularReference`] — a parent chain loops
pub fn validate_records(records: &[Node]) -> Result<(), TreeError> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(records.len());
    for record in records {
        if !ids.insert(record.id.as_str()) {
            return Err(TreeError::duplicate_id(&record.id));
        }
    }

    let mut roots = 0usize;
    for record in records {
        match record.parent_id.as_deref() {
            None => roots += 1,
            Some(parent) => {
                if parent == record.id {
                    return Err(TreeError::circular_reference(&record.id));
                }
                if !ids.contains(parent) {
                    return Err(TreeError::dangling_parent(&record.id, parent));
                }
            }
        }
    }

    if records.is_empty() {
        return Ok(());
    }
    match roots {
        1 => {}
        0 => return Err(TreeError::MissingRoot),
        n => return Err(TreeError::ambiguous_root(n)),
    }

    let parent_of: HashMap<&str, &str> = records
        .iter()
        .filter_map(|r| r.parent_id.as_deref().map(|p| (r.id.as_str(), p)))
        .collect();

    for record in records {
        let mut current = record.id.as_str();
        let mut hops = 0usize;
        while let Some(&parent) = parent_of.get(current) {
            hops += 1;
            if parent == record.id || hops > records.len() {
                return Err(TreeError::circular_reference(&record.id));
            }
            current = parent;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, parent: Option<&str>) -> Node {
        Node::new_with_id(id.to_string(), id.to_string(), parent.map(str::to_string))
    }

    #[test]
    fn test_build_empty_input() {
        assert!(build_tree(Vec::new()).is_none());
    }

    #[test]
    fn test_build_basic_chain() {
        let tree = build_tree(vec![
            record("r", None),
            record("a", Some("r")),
            record("b", Some("a")),
        ])
        .unwrap();

        assert_eq!(tree.node.id, "r");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].node.id, "a");
        assert_eq!(tree.children[0].children[0].node.id, "b");
    }

    #[test]
    fn test_build_accepts_any_input_order() {
        let tree = build_tree(vec![
            record("b", Some("a")),
            record("r", None),
            record("a", Some("r")),
        ])
        .unwrap();

        assert_eq!(tree.node.id, "r");
        assert_eq!(tree.children[0].node.id, "a");
        assert_eq!(tree.children[0].children[0].node.id, "b");
    }

    #[test]
    fn test_sibling_order_follows_encounter_order() {
        let tree = build_tree(vec![
            record("r", None),
            record("c2", Some("r")),
            record("c1", Some("r")),
            record("c3", Some("r")),
        ])
        .unwrap();

        let order: Vec<&str> = tree.children.iter().map(|c| c.node.id.as_str()).collect();
        assert_eq!(order, vec!["c2", "c1", "c3"]);
    }

    #[test]
    fn test_dangling_parent_child_becomes_unreachable_orphan() {
        // "x" names a parent outside the set; the root came first, so the
        // default policy drops it
        let tree = build_tree(vec![record("r", None), record("x", Some("ghost"))]).unwrap();

        assert_eq!(tree.node.id, "r");
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_first_root_wins_drops_extra_orphans() {
        let tree = build_tree(vec![
            record("r1", None),
            record("r2", None),
            record("k", Some("r2")),
        ])
        .unwrap();

        assert_eq!(tree.node.id, "r1");
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_adopt_under_root_keeps_extra_orphans() {
        let tree = TreeBuilder::new()
            .with_orphan_policy(OrphanPolicy::AdoptUnderRoot)
            .build(vec![
                record("r1", None),
                record("r2", None),
                record("k", Some("r2")),
            ])
            .unwrap()
            .unwrap();

        assert_eq!(tree.node.id, "r1");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].node.id, "r2");
        assert_eq!(tree.children[0].children[0].node.id, "k");
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_reject_policy_errors_on_extra_orphans() {
        let result = TreeBuilder::new()
            .with_orphan_policy(OrphanPolicy::Reject)
            .build(vec![record("r1", None), record("r2", None)]);

        assert_eq!(result, Err(TreeError::AmbiguousRoot { count: 2 }));
    }

    #[test]
    fn test_cycle_only_input_yields_no_tree() {
        let tree = build_tree(vec![record("a", Some("b")), record("b", Some("a"))]);
        assert!(tree.is_none());
    }

    #[test]
    fn test_self_parent_treated_as_orphan() {
        let tree = build_tree(vec![record("r", Some("r"))]).unwrap();
        assert_eq!(tree.node.id, "r");
    }

    #[test]
    fn test_flatten_is_preorder() {
        let tree = build_tree(vec![
            record("r", None),
            record("a", Some("r")),
            record("b", Some("a")),
            record("c", Some("r")),
        ])
        .unwrap();

        let flat = flatten_tree(&tree);
        let order: Vec<&str> = flat.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["r", "a", "b", "c"]);
    }

    #[test]
    fn test_flatten_rewrites_parent_ids_from_walk() {
        let tree = build_tree(vec![
            record("r", None),
            record("a", Some("r")),
            record("b", Some("a")),
        ])
        .unwrap();

        let flat = flatten_tree(&tree);
        assert_eq!(flat[0].parent_id, None);
        assert_eq!(flat[1].parent_id.as_deref(), Some("r"));
        assert_eq!(flat[2].parent_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_round_trip_preserves_set_and_relationships() {
        let records = vec![
            record("r", None),
            record("a", Some("r")),
            record("b", Some("a")),
            record("c", Some("r")),
            record("d", Some("c")),
        ];

        let flat = flatten_tree(&build_tree(records.clone()).unwrap());

        assert_eq!(flat.len(), records.len());
        for original in &records {
            let round_tripped = flat.iter().find(|n| n.id == original.id).unwrap();
            assert_eq!(round_tripped.parent_id, original.parent_id);
            assert_eq!(round_tripped.label, original.label);
        }

        // Rebuilding and reflattening is a fixed point
        let again = flatten_tree(&build_tree(flat.clone()).unwrap());
        assert_eq!(again, flat);
    }

    #[test]
    fn test_validate_accepts_well_formed_set() {
        let records = vec![record("r", None), record("a", Some("r"))];
        assert!(validate_records(&records).is_ok());
        assert!(validate_records(&[]).is_ok());
    }

    #[test]
    fn test_validate_reports_duplicate_ids() {
        let records = vec![record("r", None), record("r", Some("r"))];
        assert_eq!(
            validate_records(&records),
            Err(TreeError::duplicate_id("r"))
        );
    }

    #[test]
    fn test_validate_reports_dangling_parent() {
        let records = vec![record("r", None), record("a", Some("ghost"))];
        assert_eq!(
            validate_records(&records),
            Err(TreeError::dangling_parent("a", "ghost"))
        );
    }

    #[test]
    fn test_validate_reports_root_count() {
        assert_eq!(
            validate_records(&[record("a", Some("b")), record("b", Some("a"))]),
            Err(TreeError::MissingRoot)
        );
        assert_eq!(
            validate_records(&[record("r1", None), record("r2", None)]),
            Err(TreeError::ambiguous_root(2))
        );
    }

    #[test]
    fn test_validate_reports_cycle_below_root() {
        let records = vec![
            record("r", None),
            record("a", Some("b")),
            record("b", Some("a")),
        ];
        assert!(matches!(
            validate_records(&records),
            Err(TreeError::CircularReference { .. })
        ));
    }
}
