//! Recursive Layout
//!
//! The headless half of rendering: a recursive pass over the nested tree
//! that assigns every visible node a world-space rectangle and emits the
//! parent/child connection endpoints. The host paints the result and puts
//! it through the viewport transform.
//!
//! Layout shape: tidy top-down tiers. Subtree widths accumulate bottom-up,
//! children sit left-to-right in sibling order centered under their
//! parent, and each depth row is as tall as its tallest cell (a label box
//! plus any media extension). Collapsed nodes keep their place; their
//! descendants get no geometry at all.

use std::collections::HashMap;
use std::sync::Arc;

use kurbo::{Point, Rect, Size};

use crate::models::{MediaPosition, Node, NodeType};
use crate::tree::TreeNode;

/// Spacing and sizing knobs for the layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    /// Label box size
    pub node_size: Size,
    /// Horizontal gap between sibling subtrees
    pub sibling_gap: f64,
    /// Vertical gap between depth tiers
    pub tier_gap: f64,
    /// Gap between a label box and its media box
    pub media_gap: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            node_size: Size::new(160.0, 48.0),
            sibling_gap: 24.0,
            tier_gap: 64.0,
            media_gap: 8.0,
        }
    }
}

/// Render variant of a node, resolved once per node during the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderVariant {
    Root,
    Child,
    AnnotationAnchor,
}

impl RenderVariant {
    /// Map the record's type tag to a variant.
    pub fn from_type(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Root => Self::Root,
            NodeType::Child => Self::Child,
            NodeType::AnnotationAnchor => Self::AnnotationAnchor,
        }
    }
}

/// A positioned node, world space.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    /// Label payload, passed through for the host to paint
    pub label: String,
    pub color: String,
    pub variant: RenderVariant,
    pub depth: usize,
    pub collapsed: bool,
    /// Number of direct children hidden by the collapsed flag
    pub hidden_children: usize,
    /// Label box
    pub bounds: Rect,
    /// Media box, when an attachment is present
    pub media_bounds: Option<Rect>,
    pub media_position: Option<MediaPosition>,
    pub note_count: usize,
}

/// A parent→child connection, anchored at box edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from_id: String,
    pub to_id: String,
    /// Bottom center of the parent's label box
    pub from: Point,
    /// Top center of the child's label box
    pub to: Point,
}

/// The result of a layout pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MindMapLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<Edge>,
}

impl MindMapLayout {
    /// Positioned node by id.
    pub fn get(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Label box of a node, world space.
    pub fn node_bounds(&self, id: &str) -> Option<Rect> {
        self.get(id).map(|n| n.bounds)
    }

    /// Union of all node and media boxes — what a center/fit action frames.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rects = self
            .nodes
            .iter()
            .flat_map(|n| std::iter::once(n.bounds).chain(n.media_bounds));
        let first = rects.next()?;
        Some(rects.fold(first, |acc, r| acc.union(r)))
    }

    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the pass produced no geometry.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The footprint of one node's cell: its label box plus any media
/// extension.
fn cell_size(node: &Node, params: &LayoutParams) -> Size {
    let label = params.node_size;
    let Some(media) = &node.media else {
        return label;
    };
    let media_size = media.display_size();
    match media.position {
        MediaPosition::Above | MediaPosition::Below => Size::new(
            label.width.max(media_size.width),
            label.height + params.media_gap + media_size.height,
        ),
        MediaPosition::Left | MediaPosition::Right => Size::new(
            label.width + params.media_gap + media_size.width,
            label.height.max(media_size.height),
        ),
    }
}

/// Lay out the visible portion of the tree.
pub fn layout_tree(root: &Arc<TreeNode>, params: &LayoutParams) -> MindMapLayout {
    let mut widths: HashMap<String, f64> = HashMap::new();
    let mut tier_heights: Vec<f64> = Vec::new();
    measure(root, 0, params, &mut widths, &mut tier_heights);

    // cumulative y offset per tier
    let mut tier_y = Vec::with_capacity(tier_heights.len());
    let mut y = 0.0;
    for height in &tier_heights {
        tier_y.push(y);
        y += height + params.tier_gap;
    }

    let mut placer = Placer {
        params,
        widths: &widths,
        tier_y: &tier_y,
        layout: MindMapLayout::default(),
    };
    placer.place(root, 0, 0.0, None);
    placer.layout
}

/// Bottom-up pass: subtree widths by id, max cell height per tier.
fn measure(
    node: &Arc<TreeNode>,
    depth: usize,
    params: &LayoutParams,
    widths: &mut HashMap<String, f64>,
    tier_heights: &mut Vec<f64>,
) -> f64 {
    let cell = cell_size(&node.node, params);
    if tier_heights.len() <= depth {
        tier_heights.resize(depth + 1, 0.0);
    }
    tier_heights[depth] = tier_heights[depth].max(cell.height);

    let width = if node.node.collapsed || node.children.is_empty() {
        cell.width
    } else {
        let mut children_width = 0.0;
        for child in &node.children {
            children_width += measure(child, depth + 1, params, widths, tier_heights);
        }
        children_width += params.sibling_gap * (node.children.len() - 1) as f64;
        cell.width.max(children_width)
    };

    widths.insert(node.node.id.clone(), width);
    width
}

struct Placer<'a> {
    params: &'a LayoutParams,
    widths: &'a HashMap<String, f64>,
    tier_y: &'a [f64],
    layout: MindMapLayout,
}

impl Placer<'_> {
    fn place(
        &mut self,
        node: &Arc<TreeNode>,
        depth: usize,
        left: f64,
        parent: Option<(&str, Point)>,
    ) {
        let record = &node.node;
        let subtree_width = self.widths[&record.id];
        let center_x = left + subtree_width / 2.0;
        let cell = cell_size(record, self.params);
        let cell_top = self.tier_y[depth];
        let cell_left = center_x - cell.width / 2.0;

        let label = self.params.node_size;
        let gap = self.params.media_gap;
        let (label_rect, media_rect) = match &record.media {
            None => (
                Rect::from_origin_size((center_x - label.width / 2.0, cell_top), label),
                None,
            ),
            Some(media) => {
                let media_size = media.display_size();
                match media.position {
                    MediaPosition::Above => (
                        Rect::from_origin_size(
                            (center_x - label.width / 2.0, cell_top + media_size.height + gap),
                            label,
                        ),
                        Some(Rect::from_origin_size(
                            (center_x - media_size.width / 2.0, cell_top),
                            media_size,
                        )),
                    ),
                    MediaPosition::Below => (
                        Rect::from_origin_size((center_x - label.width / 2.0, cell_top), label),
                        Some(Rect::from_origin_size(
                            (center_x - media_size.width / 2.0, cell_top + label.height + gap),
                            media_size,
                        )),
                    ),
                    MediaPosition::Left => (
                        Rect::from_origin_size(
                            (
                                cell_left + media_size.width + gap,
                                cell_top + (cell.height - label.height) / 2.0,
                            ),
                            label,
                        ),
                        Some(Rect::from_origin_size(
                            (cell_left, cell_top + (cell.height - media_size.height) / 2.0),
                            media_size,
                        )),
                    ),
                    MediaPosition::Right => (
                        Rect::from_origin_size(
                            (cell_left, cell_top + (cell.height - label.height) / 2.0),
                            label,
                        ),
                        Some(Rect::from_origin_size(
                            (
                                cell_left + label.width + gap,
                                cell_top + (cell.height - media_size.height) / 2.0,
                            ),
                            media_size,
                        )),
                    ),
                }
            }
        };

        if let Some((parent_id, anchor)) = parent {
            self.layout.edges.push(Edge {
                from_id: parent_id.to_string(),
                to_id: record.id.clone(),
                from: anchor,
                to: Point::new(label_rect.center().x, label_rect.y0),
            });
        }

        self.layout.nodes.push(LayoutNode {
            id: record.id.clone(),
            label: record.label.clone(),
            color: record.color.clone(),
            variant: RenderVariant::from_type(record.node_type),
            depth,
            collapsed: record.collapsed,
            hidden_children: if record.collapsed {
                node.children.len()
            } else {
                0
            },
            bounds: label_rect,
            media_bounds: media_rect,
            media_position: record.media.as_ref().map(|m| m.position),
            note_count: record.notes.len(),
        });

        if record.collapsed || node.children.is_empty() {
            return;
        }

        let children_width: f64 = node
            .children
            .iter()
            .map(|c| self.widths[&c.node.id])
            .sum::<f64>()
            + self.params.sibling_gap * (node.children.len() - 1) as f64;
        let mut child_left = center_x - children_width / 2.0;
        let child_anchor = Point::new(label_rect.center().x, label_rect.y1);

        for child in &node.children {
            self.place(child, depth + 1, child_left, Some((&record.id, child_anchor)));
            child_left += self.widths[&child.node.id] + self.params.sibling_gap;
        }
    }
}
