//! View Geometry
//!
//! Headless models of everything the host paints:
//!
//! - `viewport` - Pan/zoom camera state with cursor-anchored zoom
//! - `selection` - Single-node selection and toolbar overlay anchoring
//! - `layout` - Recursive layout pass over the nested tree
//!
//! All coordinates are `kurbo` types. World space is where the layout
//! lives; screen space is world space put through the viewport transform.

pub mod layout;
pub mod selection;
pub mod viewport;

pub use layout::{layout_tree, Edge, LayoutNode, LayoutParams, MindMapLayout, RenderVariant};
pub use selection::{
    toolbar_anchor, toolbar_anchor_for, Selection, ToolbarAnchor, ToolbarPlacement, TOOLBAR_GAP,
};
pub use viewport::{Viewport, ZoomDirection, MAX_SCALE, MIN_SCALE, ZOOM_STEP};
