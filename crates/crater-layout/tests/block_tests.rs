//! Tests for block flow: stacking, margin collapsing, auto margins and
//! text leaves.

use crater_layout::{LayoutResult, LayoutTree, NodeId, Size, Style};

const VIEWPORT: Size<f64> = Size {
    width: 800.0,
    height: 600.0,
};

fn node(tree: &mut LayoutTree, css: &str) -> NodeId {
    tree.create_node(Style::from_css(css))
}

fn child(tree: &mut LayoutTree, parent: NodeId, css: &str) -> NodeId {
    let id = node(tree, css);
    tree.add_child(parent, id).unwrap();
    id
}

fn layout(tree: &LayoutTree, id: NodeId) -> LayoutResult {
    *tree.layout(id).unwrap()
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}

#[test]
fn test_auto_root_takes_the_viewport() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    tree.compute_layout(root, VIEWPORT).unwrap();
    let root = layout(&tree, root);
    assert_eq!((root.x, root.y, root.width, root.height), (0.0, 0.0, 800.0, 600.0));
}

#[test]
fn test_root_margins_shrink_the_viewport() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "margin: 10px 20px");
    tree.compute_layout(root, VIEWPORT).unwrap();
    let root = layout(&tree, root);
    assert_eq!((root.x, root.y), (20.0, 10.0));
    assert_eq!((root.width, root.height), (760.0, 580.0));
}

#[test]
fn test_children_stack_and_fill_width() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let a = child(&mut tree, root, "height: 50px");
    let b = child(&mut tree, root, "height: 30px");
    tree.compute_layout(root, VIEWPORT).unwrap();

    assert_eq!((layout(&tree, a).y, layout(&tree, a).width), (0.0, 800.0));
    assert_eq!((layout(&tree, b).y, layout(&tree, b).height), (50.0, 30.0));
}

#[test]
fn test_sibling_margins_collapse_to_the_larger() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let _a = child(&mut tree, root, "height: 50px; margin-bottom: 20px");
    let b = child(&mut tree, root, "height: 50px; margin-top: 30px");
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!(layout(&tree, b).y, 80.0);
}

#[test]
fn test_negative_margin_is_subtracted() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let _a = child(&mut tree, root, "height: 50px; margin-bottom: 30px");
    let b = child(&mut tree, root, "height: 50px; margin-top: -10px");
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!(layout(&tree, b).y, 70.0);
}

#[test]
fn test_auto_height_wraps_children_and_last_margin() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let wrapper = child(&mut tree, root, "padding: 5px");
    let _a = child(&mut tree, wrapper, "height: 40px; margin-bottom: 10px");
    tree.compute_layout(root, VIEWPORT).unwrap();

    let wrapper = layout(&tree, wrapper);
    assert_eq!(wrapper.height, 60.0, "5 + 40 + 10 + 5");
    assert_eq!(wrapper.padding.top, 5.0);
}

#[test]
fn test_horizontal_margins_reduce_width() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let a = child(&mut tree, root, "margin: 10px; height: 10px");
    tree.compute_layout(root, VIEWPORT).unwrap();
    let a = layout(&tree, a);
    assert_eq!((a.x, a.y, a.width), (10.0, 10.0, 780.0));
    assert_eq!(a.margin.left, 10.0);
}

#[test]
fn test_auto_margins_center_a_fixed_width_child() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let centered = child(&mut tree, root, "width: 200px; height: 10px; margin: 0 auto");
    let pushed = child(&mut tree, root, "width: 200px; height: 10px; margin-left: auto");
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!(layout(&tree, centered).x, 300.0);
    assert_eq!(layout(&tree, pushed).x, 600.0);
}

#[test]
fn test_border_box_sizing() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let content = child(&mut tree, root, "width: 100px; height: 50px; padding: 10px; border: 2px solid");
    let border = child(
        &mut tree,
        root,
        "box-sizing: border-box; width: 100px; height: 50px; padding: 10px; border: 2px solid",
    );
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!((layout(&tree, content).width, layout(&tree, content).height), (124.0, 74.0));
    assert_eq!((layout(&tree, border).width, layout(&tree, border).height), (100.0, 50.0));
}

#[test]
fn test_percentages_resolve_against_parent_content_box() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "padding: 100px");
    let a = child(&mut tree, root, "width: 50%; height: 25%");
    tree.compute_layout(root, VIEWPORT).unwrap();
    let a = layout(&tree, a);
    assert_eq!((a.x, a.y), (0.0, 0.0), "positions are content-box relative");
    assert_eq!((a.width, a.height), (300.0, 100.0));
}

#[test]
fn test_min_wins_over_max() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let a = child(&mut tree, root, "width: 50px; min-width: 120px; max-width: 80px; height: 1px");
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!(layout(&tree, a).width, 120.0);
}

#[test]
fn test_display_none_takes_no_space() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let hidden = child(&mut tree, root, "display: none; height: 100px");
    let inner = child(&mut tree, hidden, "height: 10px");
    let visible = child(&mut tree, root, "height: 10px");
    tree.compute_layout(root, VIEWPORT).unwrap();

    assert_eq!(layout(&tree, hidden).height, 0.0);
    assert_eq!(layout(&tree, inner).width, 0.0);
    assert_eq!(layout(&tree, visible).y, 0.0);
    assert!(!tree.needs_layout());
}

#[test]
fn test_relative_offset_moves_without_affecting_siblings() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let a = child(&mut tree, root, "position: relative; top: 5px; left: 7px; height: 20px");
    let b = child(&mut tree, root, "height: 20px");
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!((layout(&tree, a).x, layout(&tree, a).y), (7.0, 5.0));
    assert_eq!(layout(&tree, b).y, 20.0);
}

#[test]
fn test_absolute_child_is_out_of_flow() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let abs = child(
        &mut tree,
        root,
        "position: absolute; top: 10px; right: 20px; width: 100px; height: 40px",
    );
    let b = child(&mut tree, root, "height: 20px");
    tree.compute_layout(root, VIEWPORT).unwrap();

    let abs = layout(&tree, abs);
    assert_eq!((abs.x, abs.y), (680.0, 10.0));
    assert_eq!((abs.width, abs.height), (100.0, 40.0));
    assert_eq!(layout(&tree, b).y, 0.0);
}

#[test]
fn test_text_leaf_wraps_inside_narrow_parent() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let parent = child(&mut tree, root, "width: 60px");
    let text = tree.create_text_node("hello world", Style::default());
    tree.add_child(parent, text).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    // Each word is 48px at 16px, the line height 19.2px.
    let text = layout(&tree, text);
    assert_close(text.width, 60.0, "text width");
    assert_close(text.height, 38.4, "two lines");
    assert_close(layout(&tree, parent).height, 38.4, "parent wraps text");
}

#[test]
fn test_text_leaf_on_one_line_when_wide() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let text = tree.create_text_node("hello world", Style::from_css("font-size: 10px"));
    tree.add_child(root, text).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    let text = layout(&tree, text);
    assert_close(text.width, 66.0, "max-content width");
    assert_close(text.height, 12.0, "one line");
}
