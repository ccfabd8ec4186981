//! Tree Operations
//!
//! This module owns everything between the flat record list and the
//! navigable nested structure:
//!
//! - `builder` - Reconstruction (flat → nested), flattening (nested →
//!   flat), and strict validation of record sets
//! - `editor` - Immutable copy-on-path edits over the nested tree
//! - `disclosure` - Progressive disclosure for restricted viewing
//!
//! The nested form is a persistent tree: children are `Arc`-shared, edits
//! rebuild only the path from the root to the touched node, and callers
//! compare pointers (`Arc::ptr_eq`) to detect what changed.

pub mod builder;
pub mod disclosure;
pub mod editor;
pub mod error;
pub mod structure;

pub use builder::{build_tree, flatten_tree, validate_records, OrphanPolicy, TreeBuilder};
pub use disclosure::{
    apply_initial_disclosure, collapse, expand, DisclosureController, ViewMode,
};
pub use editor::{
    add_child, add_child_with, add_note, attach_media, delete_node, delete_note, detach_media,
    edit_note, move_node, rekey_tree, set_media_position, toggle_collapsed, update_node,
    DEFAULT_CHILD_LABEL,
};
pub use error::TreeError;
pub use structure::{find_node, TreeNode};
