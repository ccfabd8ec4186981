//! Tree Error Types
//!
//! Structural diagnostics for record sets. Build and edit operations
//! themselves degrade to no-ops on malformed input; these errors are
//! returned only by the strict entry points (`validate_records`,
//! `TreeBuilder` with `OrphanPolicy::Reject`).

use thiserror::Error;

/// Structural integrity errors over a flat record set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Every record names a parent; no root candidate exists
    #[error("No root record found: every record names a parent")]
    MissingRoot,

    /// More than one record has no resolvable parent
    #[error("Ambiguous root: {count} records have no resolvable parent")]
    AmbiguousRoot { count: usize },

    /// Two records share an id
    #[error("Duplicate node id: {id}")]
    DuplicateId { id: String },

    /// A record names a parent that is not in the set
    #[error("Dangling parent reference: node {id} names missing parent {parent_id}")]
    DanglingParent { id: String, parent_id: String },

    /// A parent chain loops back on itself
    #[error("Circular parent chain detected at node {id}")]
    CircularReference { id: String },
}

impl TreeError {
    /// Create an ambiguous root error
    pub fn ambiguous_root(count: usize) -> Self {
        Self::AmbiguousRoot { count }
    }

    /// Create a duplicate id error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a dangling parent error
    pub fn dangling_parent(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self::DanglingParent {
            id: id.into(),
            parent_id: parent_id.into(),
        }
    }

    /// Create a circular reference error
    pub fn circular_reference(id: impl Into<String>) -> Self {
        Self::CircularReference { id: id.into() }
    }
}
