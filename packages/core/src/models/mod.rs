//! Data Models
//!
//! This module contains the flat record types the engine is built around:
//!
//! - `Node` - Universal mind-map record (flat, parent-pointer form)
//! - `MediaAttachment` - Optional single media attachment per node
//! - `Note` - Free-floating annotation attached to a node
//!
//! Records are serde-serializable with camelCase field names so the host
//! can hand them to any store unchanged.

mod media;
mod node;
mod note;

pub use media::{MediaAttachment, MediaPosition};
pub use node::{Node, NodePatch, NodeStyle, NodeType, ValidationError, DEFAULT_NODE_COLOR};
pub use note::Note;
