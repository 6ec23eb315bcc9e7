//! Tests for flex layout: flexible lengths, line breaking and alignment.

use crater_layout::{LayoutTree, NodeId, Size, Style};

const VIEWPORT: Size<f64> = Size {
    width: 800.0,
    height: 600.0,
};

fn node(tree: &mut LayoutTree, css: &str) -> NodeId {
    tree.create_node(Style::from_css(css))
}

/// A root container with one child per entry of `items`.
fn container(tree: &mut LayoutTree, css: &str, items: &[&str]) -> (NodeId, Vec<NodeId>) {
    let root = node(tree, css);
    let children = items
        .iter()
        .map(|item| {
            let id = node(tree, item);
            tree.add_child(root, id).unwrap();
            id
        })
        .collect();
    tree.compute_layout(root, VIEWPORT).unwrap();
    (root, children)
}

fn xs(tree: &LayoutTree, ids: &[NodeId]) -> Vec<f64> {
    ids.iter().map(|&id| tree.layout(id).unwrap().x).collect()
}

fn ys(tree: &LayoutTree, ids: &[NodeId]) -> Vec<f64> {
    ids.iter().map(|&id| tree.layout(id).unwrap().y).collect()
}

fn widths(tree: &LayoutTree, ids: &[NodeId]) -> Vec<f64> {
    ids.iter().map(|&id| tree.layout(id).unwrap().width).collect()
}

#[test]
fn test_grow_distributes_equally() {
    let mut tree = LayoutTree::new();
    let item = "flex-grow: 1; flex-basis: 0";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; height: 100px",
        &[item, item, item],
    );
    assert_eq!(widths(&tree, &items), vec![100.0, 100.0, 100.0]);
    assert_eq!(xs(&tree, &items), vec![0.0, 100.0, 200.0]);
    assert_eq!(tree.layout(items[0]).unwrap().height, 100.0, "stretched");
}

#[test]
fn test_grow_in_proportion_to_factor() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px",
        &["flex: 1", "flex: 2"],
    );
    assert_eq!(widths(&tree, &items), vec![100.0, 200.0]);
}

#[test]
fn test_grow_respects_max_width() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px",
        &["flex-grow: 1; max-width: 50px", "flex-grow: 1"],
    );
    assert_eq!(widths(&tree, &items), vec![50.0, 250.0]);
}

#[test]
fn test_shrink_stops_at_min_width() {
    let mut tree = LayoutTree::new();
    let item = "flex-basis: 80px; min-width: 50px";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 100px; height: 50px",
        &[item, item],
    );
    for width in widths(&tree, &items) {
        assert!(width >= 50.0, "item shrank below its min-width: {width}");
    }
    assert_eq!(widths(&tree, &items), vec![50.0, 50.0]);
}

#[test]
fn test_shrink_freezes_clamped_items() {
    let mut tree = LayoutTree::new();
    let item = "flex-basis: 80px; min-width: 60px";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 100px; height: 50px",
        &[item, item],
    );
    assert_eq!(widths(&tree, &items), vec![60.0, 60.0], "overflow rather than violate min");
}

#[test]
fn test_no_grow_no_shrink_keeps_basis() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 100px",
        &["flex: none; width: 80px", "flex: none; width: 80px"],
    );
    assert_eq!(widths(&tree, &items), vec![80.0, 80.0]);
    assert_eq!(xs(&tree, &items), vec![0.0, 80.0]);
}

#[test]
fn test_justify_content_center() {
    let mut tree = LayoutTree::new();
    let item = "width: 50px; height: 20px";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; height: 100px; justify-content: center",
        &[item, item],
    );
    assert_eq!(xs(&tree, &items), vec![100.0, 150.0]);
}

#[test]
fn test_justify_content_space_between() {
    let mut tree = LayoutTree::new();
    let item = "width: 50px; height: 20px";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; justify-content: space-between",
        &[item, item, item],
    );
    assert_eq!(xs(&tree, &items), vec![0.0, 125.0, 250.0]);
}

#[test]
fn test_justify_content_space_evenly() {
    let mut tree = LayoutTree::new();
    let item = "width: 50px; height: 20px";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; justify-content: space-evenly",
        &[item, item],
    );
    // 200px free across three gaps.
    let x = xs(&tree, &items);
    assert!((x[0] - 200.0 / 3.0).abs() < 1e-9);
    assert!((x[1] - (400.0 / 3.0 + 50.0)).abs() < 1e-9);
}

#[test]
fn test_auto_margin_absorbs_free_space() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; justify-content: center",
        &["width: 50px", "width: 50px; margin-left: auto"],
    );
    assert_eq!(xs(&tree, &items), vec![0.0, 250.0]);
}

#[test]
fn test_row_reverse_mirrors_positions() {
    let mut tree = LayoutTree::new();
    let item = "width: 50px";
    let (_, items) = container(
        &mut tree,
        "display: flex; flex-direction: row-reverse; width: 300px",
        &[item, item],
    );
    assert_eq!(xs(&tree, &items), vec![250.0, 200.0]);
}

#[test]
fn test_column_direction_stacks_and_stretches() {
    let mut tree = LayoutTree::new();
    let item = "height: 50px";
    let (_, items) = container(
        &mut tree,
        "display: flex; flex-direction: column; height: 300px",
        &[item, item],
    );
    assert_eq!(ys(&tree, &items), vec![0.0, 50.0]);
    assert_eq!(widths(&tree, &items), vec![800.0, 800.0]);
}

#[test]
fn test_column_grow_fills_height() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; flex-direction: column; height: 300px",
        &["height: 100px", "flex-grow: 1"],
    );
    assert_eq!(tree.layout(items[1]).unwrap().height, 200.0);
    assert_eq!(tree.layout(items[1]).unwrap().y, 100.0);
}

#[test]
fn test_wrap_breaks_lines_greedily() {
    let mut tree = LayoutTree::new();
    let item = "width: 40px; height: 20px";
    let (_, items) = container(
        &mut tree,
        "display: flex; flex-wrap: wrap; align-content: flex-start; width: 100px",
        &[item, item, item],
    );
    assert_eq!(xs(&tree, &items), vec![0.0, 40.0, 0.0]);
    assert_eq!(ys(&tree, &items), vec![0.0, 0.0, 20.0]);
}

#[test]
fn test_wrap_reverse_flips_line_order() {
    let mut tree = LayoutTree::new();
    let item = "width: 40px; height: 20px";
    let (_, items) = container(
        &mut tree,
        "display: flex; flex-wrap: wrap-reverse; align-content: flex-start; width: 100px; height: 100px",
        &[item, item, item],
    );
    assert_eq!(ys(&tree, &items), vec![80.0, 80.0, 60.0]);
}

#[test]
fn test_nowrap_keeps_one_line() {
    let mut tree = LayoutTree::new();
    let item = "flex-shrink: 0; width: 40px; height: 20px";
    let (_, items) = container(&mut tree, "display: flex; width: 100px", &[item, item, item]);
    assert_eq!(xs(&tree, &items), vec![0.0, 40.0, 80.0]);
    assert_eq!(ys(&tree, &items), vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_order_reorders_layout_but_not_children() {
    let mut tree = LayoutTree::new();
    let (root, items) = container(
        &mut tree,
        "display: flex; width: 300px",
        &["order: 2; width: 50px", "order: 1; width: 50px"],
    );
    assert_eq!(xs(&tree, &items), vec![50.0, 0.0]);
    assert_eq!(tree.children(root).unwrap(), items.as_slice());
}

#[test]
fn test_column_gap_separates_items() {
    let mut tree = LayoutTree::new();
    let item = "width: 50px";
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; column-gap: 10px",
        &[item, item, item],
    );
    assert_eq!(xs(&tree, &items), vec![0.0, 60.0, 120.0]);
}

#[test]
fn test_align_items_center_and_end() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; height: 100px; align-items: center",
        &["height: 20px", "height: 20px; align-self: flex-end"],
    );
    assert_eq!(ys(&tree, &items), vec![40.0, 80.0]);
}

#[test]
fn test_stretch_respects_explicit_cross_size() {
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; width: 300px; height: 100px",
        &["width: 10px", "width: 10px; height: 30px"],
    );
    assert_eq!(tree.layout(items[0]).unwrap().height, 100.0);
    assert_eq!(tree.layout(items[1]).unwrap().height, 30.0);
}

#[test]
fn test_auto_height_row_container_fits_tallest_item() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "");
    let row = node(&mut tree, "display: flex");
    tree.add_child(root, row).unwrap();
    for height in ["height: 20px", "height: 45px"] {
        let id = node(&mut tree, height);
        tree.add_child(row, id).unwrap();
    }
    tree.compute_layout(root, VIEWPORT).unwrap();
    assert_eq!(tree.layout(row).unwrap().height, 45.0);
}

#[test]
fn test_zero_size_container_does_not_go_negative() {
    let mut tree = LayoutTree::new();
    let item = "flex-grow: 1; padding: 5px";
    let (_, items) = container(&mut tree, "display: flex; width: 0; height: 0", &[item, item]);
    for id in items {
        let layout = tree.layout(id).unwrap();
        assert!(layout.width >= 10.0, "padding is never squeezed");
        assert!(layout.x >= 0.0);
    }
}

fn heights(tree: &LayoutTree, ids: &[NodeId]) -> Vec<f64> {
    ids.iter().map(|&id| tree.layout(id).unwrap().height).collect()
}

/// Two 60px items in a 100px wide, 200px tall wrapping row: one per line.
fn two_lines(tree: &mut LayoutTree, align_content: &str, item: &str) -> Vec<NodeId> {
    let css = format!(
        "display: flex; flex-wrap: wrap; width: 100px; height: 200px; {align_content}"
    );
    container(tree, &css, &[item, item]).1
}

#[test]
fn test_align_content_center_packs_lines_in_the_middle() {
    let mut tree = LayoutTree::new();
    let items = two_lines(&mut tree, "align-content: center", "width: 60px; height: 20px");
    assert_eq!(ys(&tree, &items), vec![80.0, 100.0]);
}

#[test]
fn test_align_content_space_between_pushes_lines_apart() {
    let mut tree = LayoutTree::new();
    let items = two_lines(
        &mut tree,
        "align-content: space-between",
        "width: 60px; height: 20px",
    );
    assert_eq!(ys(&tree, &items), vec![0.0, 180.0]);
}

#[test]
fn test_align_content_stretch_grows_lines() {
    let mut tree = LayoutTree::new();
    let items = two_lines(&mut tree, "align-content: stretch", "width: 60px");
    assert_eq!(ys(&tree, &items), vec![0.0, 100.0]);
    assert_eq!(heights(&tree, &items), vec![100.0, 100.0]);

    // The initial value behaves as stretch; fixed-height items keep their
    // size at the start of the taller line.
    let mut tree = LayoutTree::new();
    let items = two_lines(&mut tree, "", "width: 60px; height: 20px");
    assert_eq!(ys(&tree, &items), vec![0.0, 100.0]);
    assert_eq!(heights(&tree, &items), vec![20.0, 20.0]);
}

#[test]
fn test_align_items_baseline_with_different_font_sizes() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "display: flex; align-items: baseline; width: 300px");
    let small = tree.create_text_node("small", Style::from_css("font-size: 10px"));
    let large = tree.create_text_node("large", Style::from_css("font-size: 20px"));
    tree.add_child(root, small).unwrap();
    tree.add_child(root, large).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    // Baselines sit at 1 + 8 = 9px and 2 + 16 = 18px below each top edge.
    let tops = ys(&tree, &[small, large]);
    assert!((tops[0] - 9.0).abs() < 1e-9);
    assert!(tops[1].abs() < 1e-9);
    assert!((tree.layout(root).unwrap().height - 24.0).abs() < 1e-9);
}

#[test]
fn test_align_items_baseline_accounts_for_padding() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "display: flex; align-items: baseline; width: 300px");
    let padded = node(&mut tree, "padding-top: 10px");
    let plain = node(&mut tree, "");
    let small = tree.create_text_node("a", Style::from_css("font-size: 10px"));
    let large = tree.create_text_node("b", Style::from_css("font-size: 20px"));
    tree.add_child(root, padded).unwrap();
    tree.add_child(root, plain).unwrap();
    tree.add_child(padded, small).unwrap();
    tree.add_child(plain, large).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    // 10 + 9 = 19px against 18px: the unpadded item drops by one pixel.
    let tops = ys(&tree, &[padded, plain]);
    assert!(tops[0].abs() < 1e-9);
    assert!((tops[1] - 1.0).abs() < 1e-9);

    // Items that opt out keep flex-start.
    let mut tree = LayoutTree::new();
    let (_, items) = container(
        &mut tree,
        "display: flex; align-items: baseline; width: 300px",
        &["height: 20px", "height: 40px", "height: 10px; align-self: flex-start"],
    );
    assert_eq!(ys(&tree, &items), vec![20.0, 0.0, 0.0]);
}
