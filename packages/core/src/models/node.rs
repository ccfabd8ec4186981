//! Node Record
//!
//! This module defines the core `Node` struct: the persisted unit of a
//! mind map in flat, parent-pointer form.
//!
//! # Architecture
//!
//! - **Flat record**: nodes reference each other by `parent_id`; exactly
//!   one record per set has no parent (the root)
//! - **Opaque label**: the label is a rich-text blob the engine stores and
//!   round-trips but never parses or validates
//! - **Patch updates**: field changes flow through [`NodePatch`], which
//!   distinguishes "leave", "clear", and "set" for nullable fields
//!
//! # Examples
//!
//! ```rust
//! use mindgraph_core::models::Node;
//!
//! // Create a root node
//! let root = Node::new_root("Photosynthesis".to_string());
//! assert!(root.is_root());
//!
//! // Create a child under it
//! let child = Node::new("Light reactions".to_string(), Some(root.id.clone()));
//! assert!(!child.is_root());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::media::MediaAttachment;
use crate::models::note::Note;

/// Display accent applied to freshly created nodes.
pub const DEFAULT_NODE_COLOR: &str = "#e2e8f0";

/// Validation errors for Node records
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Invalid media attachment: {0}")]
    InvalidMedia(String),

    #[error("Invalid note: {0}")]
    InvalidNote(String),
}

/// Rendering variant of a node.
///
/// Classification is informative: the root variant is conventionally the
/// single record with no `parent_id`, but nothing beyond that single-root
/// rule is structurally enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// The single top-level node of a tree
    Root,
    /// A regular child node
    #[default]
    Child,
    /// A node acting as anchor for free-floating annotations
    AnnotationAnchor,
}

/// Optional style flags carried by a node.
///
/// The label itself stays an opaque blob; these flags describe the node
/// box, not the text runs inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default)]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    /// Label font size override, in the host's units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// Universal mind-map record in flat (parent-pointer) form.
///
/// # Fields
///
/// - `id`: opaque unique identifier, stable for the node's lifetime
/// - `label`: rich-text payload (may embed inline style markers)
/// - `parent_id`: optional reference to another record's id; absent for
///   exactly one record per set (the root)
/// - `color`: free-form display accent
/// - `node_type`: rendering variant (root / child / annotation anchor)
/// - `collapsed`: when true, descendants are not rendered but remain in
///   the data set
/// - `style`: optional style flags
/// - `media`: optional single attachment (never more than one)
/// - `notes`: ordered annotations; leaves attached to the node, never part
///   of the parent/child tree
/// - `created_at` / `modified_at`: maintained by the editor; edits through
///   [`NodePatch`] refresh `modified_at` on the touched node only
///
/// # Examples
///
/// ```rust
/// # use mindgraph_core::models::Node;
/// let root = Node::new_root("Course outline".to_string());
/// let child = Node::new("Week 1".to_string(), Some(root.id.clone()));
/// assert_eq!(child.parent_id.as_deref(), Some(root.id.as_str()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (UUID for generated nodes; callers may supply
    /// deterministic ids)
    pub id: String,

    /// Rich-text label payload
    #[serde(default)]
    pub label: String,

    /// Parent record id; `None` for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Display accent, free-form
    #[serde(default = "default_color")]
    pub color: String,

    /// Rendering variant
    #[serde(default)]
    pub node_type: NodeType,

    /// When true, descendants are hidden but retained
    #[serde(default)]
    pub collapsed: bool,

    /// Optional style flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,

    /// Optional single media attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaAttachment>,

    /// Ordered annotation notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_NODE_COLOR.to_string()
}

impl Node {
    /// Create a new Node with an auto-generated UUID.
    ///
    /// The rendering variant is derived from `parent_id`: records without a
    /// parent start as [`NodeType::Root`], everything else as
    /// [`NodeType::Child`].
    pub fn new(label: String, parent_id: Option<String>) -> Self {
        let now = Utc::now();
        let node_type = if parent_id.is_none() {
            NodeType::Root
        } else {
            NodeType::Child
        };

        Self {
            id: Uuid::new_v4().to_string(),
            label,
            parent_id,
            color: default_color(),
            node_type,
            collapsed: false,
            style: None,
            media: None,
            notes: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Create the initial root node, labeled from a title.
    pub fn new_root(label: String) -> Self {
        Self::new(label, None)
    }

    /// Create a new Node with a caller-specified id.
    ///
    /// Hosts that track nodes optimistically pre-generate ids so that
    /// client and store agree; this constructor covers that path.
    pub fn new_with_id(id: String, label: String, parent_id: Option<String>) -> Self {
        let mut node = Self::new(label, parent_id);
        node.id = id;
        node
    }

    /// Check if this record is the root (has no parent reference).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Validate record-level integrity.
    ///
    /// The label is allowed to be empty: blank nodes are valid during
    /// editing and are filled in or deleted by the user.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `id` is empty
    /// - the record references itself as parent
    /// - the media attachment carries a non-positive or non-finite scale,
    ///   or a negative intrinsic size
    /// - two notes share an id
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if let Some(parent_id) = &self.parent_id {
            if parent_id == &self.id {
                return Err(ValidationError::InvalidParent(
                    "node cannot be its own parent".to_string(),
                ));
            }
        }

        if let Some(media) = &self.media {
            media.validate()?;
        }

        for (i, note) in self.notes.iter().enumerate() {
            if note.id.is_empty() {
                return Err(ValidationError::InvalidNote(format!(
                    "note at index {} has an empty id",
                    i
                )));
            }
            if self.notes[..i].iter().any(|n| n.id == note.id) {
                return Err(ValidationError::InvalidNote(format!(
                    "duplicate note id: {}",
                    note.id
                )));
            }
        }

        Ok(())
    }

    /// Merge a patch into this record.
    ///
    /// Refreshes `modified_at` unless the patch is empty. `parent_id` is
    /// deliberately not patchable here: reparenting is a structural edit
    /// that goes through the tree editor.
    pub fn apply_patch(&mut self, patch: &NodePatch) {
        if patch.is_empty() {
            return;
        }

        if let Some(label) = &patch.label {
            self.label = label.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(node_type) = patch.node_type {
            self.node_type = node_type;
        }
        if let Some(collapsed) = patch.collapsed {
            self.collapsed = collapsed;
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
        if let Some(media) = &patch.media {
            self.media = media.clone();
        }

        self.modified_at = Utc::now();
    }
}

/// Custom deserializer for optional fields that accepts both plain values
/// and null.
///
/// Maps three input formats to the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (clear)
/// - value → Some(Some(value)) (set)
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    // Missing field is handled by #[serde(default)] on the struct field
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update for the immutable tree editor.
///
/// All fields are optional to support partial updates; only provided
/// fields are applied.
///
/// # Double-Option Pattern for Nullable Fields
///
/// `style` and `media` use a double-`Option` to distinguish three states:
///
/// - `None`: leave the field untouched
/// - `Some(None)`: clear the field (detach media, drop style flags)
/// - `Some(Some(value))`: set the field
///
/// # Examples
///
/// ```rust
/// # use mindgraph_core::models::NodePatch;
/// // Relabel only
/// let patch = NodePatch::new().with_label("Updated".to_string());
///
/// // Relabel and detach the media attachment
/// let patch = NodePatch {
///     label: Some("Updated".to_string()),
///     media: Some(None),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// Replace the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Replace the display accent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Replace the rendering variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    /// Replace the collapsed flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,

    /// Replace or clear the style flags (double-Option)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub style: Option<Option<NodeStyle>>,

    /// Replace or clear the media attachment (double-Option)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub media: Option<Option<MediaAttachment>>,
}

impl NodePatch {
    /// Create a new empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a label replacement
    pub fn with_label(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }

    /// Set a color replacement
    pub fn with_color(mut self, color: String) -> Self {
        self.color = Some(color);
        self
    }

    /// Set a rendering-variant replacement
    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    /// Set a collapsed-flag replacement
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Some(collapsed);
        self
    }

    /// Set a style replacement
    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = Some(Some(style));
        self
    }

    /// Set a media replacement
    pub fn with_media(mut self, media: MediaAttachment) -> Self {
        self.media = Some(Some(media));
        self
    }

    /// Check if the patch contains any changes
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.color.is_none()
            && self.node_type.is_none()
            && self.collapsed.is_none()
            && self.style.is_none()
            && self.media.is_none()
    }
}
