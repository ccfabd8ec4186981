//! Selection & Toolbar Positioning
//!
//! At most one node is selected at a time. The editing overlay (toolbar)
//! anchors to the selected node's rendered bounds and must track it under
//! every viewport transform, so the host recomputes the anchor whenever
//! selection, scale, or pan changes.

use kurbo::{Point, Rect};

use crate::models::MediaPosition;
use crate::view::layout::MindMapLayout;
use crate::view::viewport::Viewport;

/// Screen-space distance between the node box and the toolbar anchor.
pub const TOOLBAR_GAP: f64 = 8.0;

/// Which side of the node the toolbar sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarPlacement {
    Above,
    Below,
}

/// A computed overlay anchor, screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarAnchor {
    pub position: Point,
    pub placement: ToolbarPlacement,
}

/// Single-node selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a node, replacing any previous selection.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Currently selected node id, if any.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether `id` is the selected node.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }
}

/// Compute the toolbar anchor for a node.
///
/// The anchor sits centered above the node's screen bounds — unless the
/// node's media attachment is positioned above its label, in which case
/// the toolbar flips below the node so it does not obscure the image.
pub fn toolbar_anchor(
    viewport: &Viewport,
    node_bounds: Rect,
    media_position: Option<MediaPosition>,
) -> ToolbarAnchor {
    let screen = viewport.transform().transform_rect_bbox(node_bounds);
    if media_position == Some(MediaPosition::Above) {
        ToolbarAnchor {
            position: Point::new(screen.center().x, screen.y1 + TOOLBAR_GAP),
            placement: ToolbarPlacement::Below,
        }
    } else {
        ToolbarAnchor {
            position: Point::new(screen.center().x, screen.y0 - TOOLBAR_GAP),
            placement: ToolbarPlacement::Above,
        }
    }
}

/// Resolve the anchor for the current selection against a layout.
///
/// Returns `None` when nothing is selected or the selected node has no
/// geometry (for example, it sits inside a collapsed subtree).
pub fn toolbar_anchor_for(
    selection: &Selection,
    layout: &MindMapLayout,
    viewport: &Viewport,
) -> Option<ToolbarAnchor> {
    let id = selection.selected_id()?;
    let node = layout.get(id)?;
    Some(toolbar_anchor(viewport, node.bounds, node.media_position))
}
