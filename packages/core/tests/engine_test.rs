//! End-to-End Engine Tests
//!
//! Drives the public API the way a host view layer does: load a flat list
//! from a store, reconstruct, run a viewing/editing session, flatten back
//! for persistence.

use mindgraph_core::models::{MediaAttachment, MediaPosition, Node, NodePatch, Note};
use mindgraph_core::tree::{
    add_child, add_note, attach_media, build_tree, delete_node, find_node, flatten_tree,
    rekey_tree, update_node, validate_records, DisclosureController, ViewMode,
};
use mindgraph_core::view::{
    layout_tree, toolbar_anchor_for, LayoutParams, Selection, ToolbarPlacement, Viewport,
    ZoomDirection,
};

fn record(id: &str, label: &str, parent: Option<&str>) -> Node {
    Node::new_with_id(id.to_string(), label.to_string(), parent.map(str::to_string))
}

fn course_records() -> Vec<Node> {
    vec![
        record("root", "Cell Biology", None),
        record("membrane", "Membranes", Some("root")),
        record("transport", "Transport", Some("membrane")),
        record("osmosis", "Osmosis", Some("transport")),
        record("organelles", "Organelles", Some("root")),
        record("mito", "Mitochondria", Some("organelles")),
    ]
}

#[test]
fn test_editor_session_load_edit_save() {
    let records = course_records();
    validate_records(&records).unwrap();

    let tree = build_tree(records).unwrap();

    // rename a topic, annotate it, attach an image
    let tree = update_node(
        &tree,
        "membrane",
        &NodePatch::new().with_label("Cell membranes".to_string()),
    );
    let tree = add_note(
        &tree,
        "osmosis",
        Note::new("ask about tonicity in class".to_string(), "#fde68a".to_string()),
    );
    let mut diagram = MediaAttachment::new("media/osmosis-diagram".to_string(), 240.0, 160.0);
    diagram.position = MediaPosition::Above;
    let tree = attach_media(&tree, "osmosis", diagram);

    // grow and prune
    let tree = add_child(&tree, "organelles");
    let tree = delete_node(&tree, "mito").unwrap();

    // save: the flat list stays well-formed and reloadable
    let saved = flatten_tree(&tree);
    validate_records(&saved).unwrap();
    assert!(saved.iter().any(|n| n.label == "Cell membranes"));
    assert!(saved.iter().all(|n| n.id != "mito"));

    let reloaded = build_tree(saved.clone()).unwrap();
    assert_eq!(flatten_tree(&reloaded), saved);
}

#[test]
fn test_restricted_viewing_session() {
    let tree = build_tree(course_records()).unwrap();

    let viewer = DisclosureController::new(ViewMode::Restricted);
    let display = viewer.initialize(&tree);

    // first render: root plus depth 1 only
    let layout = layout_tree(&display, &LayoutParams::default());
    assert_eq!(layout.len(), 3);
    assert!(layout.get("transport").is_none());

    // drill into membranes: transport appears, osmosis stays hidden
    let display = viewer.toggle(&display, "membrane");
    let layout = layout_tree(&display, &LayoutParams::default());
    assert!(layout.get("transport").is_some());
    assert!(layout.get("osmosis").is_none());

    // the caller's stored tree kept its stored collapsed values
    assert!(!find_node(&tree, "membrane").unwrap().node.collapsed);
}

#[test]
fn test_viewport_and_toolbar_track_selection() {
    let tree = build_tree(course_records()).unwrap();
    let layout = layout_tree(&tree, &LayoutParams::default());

    let mut viewport = Viewport::new();
    let mut selection = Selection::new();
    selection.select("membrane");

    let resting = toolbar_anchor_for(&selection, &layout, &viewport).unwrap();
    assert_eq!(resting.placement, ToolbarPlacement::Above);

    // zooming about the anchor's own position keeps overlay math coherent
    viewport.zoom_at(resting.position, ZoomDirection::In);
    let zoomed = toolbar_anchor_for(&selection, &layout, &viewport).unwrap();
    assert_ne!(resting.position, zoomed.position);

    // selecting a node with media above its label flips the toolbar
    let mut diagram = MediaAttachment::new("media/figure".to_string(), 200.0, 120.0);
    diagram.position = MediaPosition::Above;
    let tree = attach_media(&tree, "organelles", diagram);
    let layout = layout_tree(&tree, &LayoutParams::default());
    selection.select("organelles");
    let flipped = toolbar_anchor_for(&selection, &layout, &viewport).unwrap();
    assert_eq!(flipped.placement, ToolbarPlacement::Below);

    // nothing selected, nothing anchored
    selection.clear();
    assert!(toolbar_anchor_for(&selection, &layout, &viewport).is_none());
}

#[test]
fn test_generated_tree_enters_like_any_other() {
    // an external generator hands over a nested structure; the engine
    // reassigns identifiers and flattens it identically to a built tree
    let generated = build_tree(vec![
        record("tmp-0", "Outline", None),
        record("tmp-1", "Chapter 1", Some("tmp-0")),
        record("tmp-2", "Chapter 2", Some("tmp-0")),
    ])
    .unwrap();

    let adopted = rekey_tree(&generated);
    let flat = flatten_tree(&adopted);

    validate_records(&flat).unwrap();
    assert_eq!(flat.len(), 3);
    assert!(flat.iter().all(|n| !n.id.starts_with("tmp-")));
    assert_eq!(flat[0].label, "Outline");
}
