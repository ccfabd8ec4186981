//! MindGraph Core Engine
//!
//! This crate provides the hierarchical node-graph (mind-map) engine: flat
//! node records with parent references in, a navigable nested tree plus
//! viewport and selection geometry out.
//!
//! # Architecture
//!
//! - **Flat records, nested views**: callers persist a flat `Vec<Node>`;
//!   the engine reconstructs the nested tree for display and flattens it
//!   back on save
//! - **Persistent tree**: every edit returns a new root sharing untouched
//!   subtrees via `Arc`, so callers detect change by pointer comparison
//! - **Headless geometry**: pan/zoom, selection anchoring, and the
//!   recursive layout pass produce coordinates; the host paints them
//! - **No I/O**: loading, saving, uploads, and AI generation live outside
//!   this crate behind narrow boundaries
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NodePatch, MediaAttachment, Note)
//! - [`tree`] - Tree building, flattening, immutable editing, disclosure
//! - [`view`] - Viewport pan/zoom, selection, recursive layout

pub mod models;
pub mod tree;
pub mod view;

// Re-export commonly used types
pub use models::*;
pub use tree::*;
pub use view::*;
