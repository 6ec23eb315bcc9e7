//! Tests for grid layout: track sizing, placement and alignment.

use crater_layout::{LayoutResult, LayoutTree, NodeId, Size, Style};

const VIEWPORT: Size<f64> = Size {
    width: 800.0,
    height: 600.0,
};

fn node(tree: &mut LayoutTree, css: &str) -> NodeId {
    tree.create_node(Style::from_css(css))
}

fn grid(tree: &mut LayoutTree, css: &str, items: &[&str]) -> Vec<NodeId> {
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
    children
}

fn rect(tree: &LayoutTree, id: NodeId) -> (f64, f64, f64, f64) {
    let LayoutResult {
        x,
        y,
        width,
        height,
        ..
    } = *tree.layout(id).unwrap();
    (x, y, width, height)
}

#[test]
fn test_fr_tracks_share_leftover_space() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; width: 300px; grid-template-columns: 100px 1fr 1fr",
        &["", "", ""],
    );
    let widths: Vec<f64> = items.iter().map(|&i| rect(&tree, i).2).collect();
    let xs: Vec<f64> = items.iter().map(|&i| rect(&tree, i).0).collect();
    assert_eq!(widths, vec![100.0, 100.0, 100.0]);
    assert_eq!(xs, vec![0.0, 100.0, 200.0]);
}

#[test]
fn test_fr_factors_are_proportional() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; width: 300px; grid-template-columns: 1fr 2fr",
        &["", ""],
    );
    assert_eq!(rect(&tree, items[0]).2, 100.0);
    assert_eq!(rect(&tree, items[1]).2, 200.0);
}

#[test]
fn test_repeat_expands_tracks() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: repeat(4, 50px); grid-auto-rows: 10px",
        &["", "", "", "", ""],
    );
    assert_eq!(rect(&tree, items[3]).0, 150.0);
    assert_eq!((rect(&tree, items[4]).0, rect(&tree, items[4]).1), (0.0, 10.0));
}

#[test]
fn test_definite_placement_with_span_to_line() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: 100px 100px 100px; grid-template-rows: 50px 50px",
        &["grid-column: 2 / 4; grid-row: 2"],
    );
    assert_eq!(rect(&tree, items[0]), (100.0, 50.0, 200.0, 50.0));
}

#[test]
fn test_negative_line_counts_from_explicit_end() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: 100px 100px 100px; grid-auto-rows: 10px",
        &["grid-column: -2"],
    );
    assert_eq!(rect(&tree, items[0]).0, 200.0);
}

#[test]
fn test_row_auto_flow_fills_rows_first() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: 100px 100px 100px; grid-auto-rows: 40px",
        &["", "", "", ""],
    );
    assert_eq!((rect(&tree, items[2]).0, rect(&tree, items[2]).1), (200.0, 0.0));
    assert_eq!((rect(&tree, items[3]).0, rect(&tree, items[3]).1), (0.0, 40.0));
    assert_eq!(rect(&tree, items[3]).3, 40.0);
}

#[test]
fn test_column_auto_flow_fills_columns_first() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-auto-flow: column; grid-template-rows: 50px 50px; grid-auto-columns: 100px",
        &["", "", ""],
    );
    let positions: Vec<(f64, f64)> = items
        .iter()
        .map(|&i| (rect(&tree, i).0, rect(&tree, i).1))
        .collect();
    assert_eq!(positions, vec![(0.0, 0.0), (0.0, 50.0), (100.0, 0.0)]);
}

#[test]
fn test_span_pushes_following_items() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: repeat(3, 100px); grid-auto-rows: 40px",
        &["grid-column: span 2", "", ""],
    );
    assert_eq!(rect(&tree, items[0]).2, 200.0);
    assert_eq!(rect(&tree, items[1]).0, 200.0);
    assert_eq!((rect(&tree, items[2]).0, rect(&tree, items[2]).1), (0.0, 40.0));
}

#[test]
fn test_gaps_separate_tracks() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: 100px 100px; grid-auto-rows: 40px; column-gap: 20px; row-gap: 10px",
        &["", "", ""],
    );
    assert_eq!(rect(&tree, items[1]).0, 120.0);
    assert_eq!(rect(&tree, items[2]).1, 50.0);
}

#[test]
fn test_gap_is_excluded_from_fr_space() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; width: 310px; grid-template-columns: 1fr 1fr; gap: 0 10px",
        &["", ""],
    );
    assert_eq!(rect(&tree, items[0]).2, 150.0);
    assert_eq!(rect(&tree, items[1]).0, 160.0);
}

#[test]
fn test_justify_content_offsets_tracks() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; width: 300px; grid-template-columns: 100px 100px; justify-content: center",
        &["", ""],
    );
    assert_eq!(rect(&tree, items[0]).0, 50.0);
    assert_eq!(rect(&tree, items[1]).0, 150.0);
}

#[test]
fn test_auto_rows_stretch_to_container() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; height: 200px; grid-template-columns: 100px",
        &["", ""],
    );
    assert_eq!(rect(&tree, items[0]).3, 100.0);
    assert_eq!(rect(&tree, items[1]).1, 100.0);
}

#[test]
fn test_self_alignment_within_area() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: 100px; grid-template-rows: 100px",
        &["width: 20px; height: 20px; align-self: center; justify-self: end"],
    );
    assert_eq!(rect(&tree, items[0]), (80.0, 40.0, 20.0, 20.0));
}

#[test]
fn test_max_content_track_fits_text() {
    let mut tree = LayoutTree::new();
    let root = node(
        &mut tree,
        "display: grid; width: 300px; grid-template-columns: max-content 1fr",
    );
    let text = tree.create_text_node("hello", Style::from_css("font-size: 10px"));
    let other = node(&mut tree, "");
    tree.add_child(root, text).unwrap();
    tree.add_child(root, other).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    // Five characters at 6px each.
    assert!((rect(&tree, text).2 - 30.0).abs() < 1e-9);
    assert!((rect(&tree, other).0 - 30.0).abs() < 1e-9);
    assert!((rect(&tree, other).2 - 270.0).abs() < 1e-9);
}

#[test]
fn test_span_distributes_equally_over_auto_tracks() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: auto auto; justify-content: start",
        &["grid-column: span 2; width: 200px", "", ""],
    );
    assert_eq!(rect(&tree, items[0]).2, 200.0);
    assert_eq!((rect(&tree, items[1]).0, rect(&tree, items[1]).2), (0.0, 100.0));
    assert_eq!((rect(&tree, items[2]).0, rect(&tree, items[2]).2), (100.0, 100.0));

    // Under `normal` the auto tracks then stretch over the rest.
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: auto auto",
        &["grid-column: span 2; width: 200px", "", ""],
    );
    assert_eq!(rect(&tree, items[2]).0, 400.0);
}

#[test]
fn test_span_over_min_and_max_content_tracks() {
    let mut tree = LayoutTree::new();
    let root = node(
        &mut tree,
        "display: grid; grid-template-columns: min-content max-content",
    );
    // Min-content 24px ("bbbb"), max-content 42px.
    let text = tree.create_text_node(
        "aa bbbb",
        Style::from_css("font-size: 10px; grid-column: span 2"),
    );
    let left = node(&mut tree, "");
    let right = node(&mut tree, "");
    for child in [text, left, right] {
        tree.add_child(root, child).unwrap();
    }
    tree.compute_layout(root, VIEWPORT).unwrap();

    // The minimum is shared by both tracks; the max-content excess only
    // grows the max-content track.
    assert!((rect(&tree, left).2 - 12.0).abs() < 1e-9);
    assert!((rect(&tree, right).0 - 12.0).abs() < 1e-9);
    assert!((rect(&tree, right).2 - 30.0).abs() < 1e-9);
    assert!((rect(&tree, text).2 - 42.0).abs() < 1e-9);
}

#[test]
fn test_span_over_fr_tracks_in_content_sized_grid() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "display: flex");
    let grid = node(&mut tree, "display: grid; grid-template-columns: 1fr 1fr");
    let wide = node(&mut tree, "grid-column: span 2; width: 200px");
    let below = node(&mut tree, "");
    tree.add_child(root, grid).unwrap();
    tree.add_child(grid, wide).unwrap();
    tree.add_child(grid, below).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    assert_eq!(rect(&tree, grid).2, 200.0);
    assert_eq!(rect(&tree, wide).2, 200.0);
    assert_eq!(rect(&tree, below).2, 100.0);
}

#[test]
fn test_span_over_fr_tracks_uses_max_content() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, "display: flex");
    let grid = node(&mut tree, "display: grid; grid-template-columns: 1fr 1fr");
    let text = tree.create_text_node(
        "aa bbbb",
        Style::from_css("font-size: 10px; grid-column: span 2"),
    );
    tree.add_child(root, grid).unwrap();
    tree.add_child(grid, text).unwrap();
    tree.compute_layout(root, VIEWPORT).unwrap();

    // Wide enough for the whole text on one line, not just its longest word.
    assert!((rect(&tree, grid).2 - 42.0).abs() < 1e-9);
    assert!((rect(&tree, text).3 - 12.0).abs() < 1e-9);
}

#[test]
fn test_huge_line_numbers_are_clamped() {
    let mut tree = LayoutTree::new();
    let items = grid(
        &mut tree,
        "display: grid; grid-template-columns: 100px; grid-auto-rows: 1px",
        &["grid-row: 2000000000", "grid-row: 1; grid-column: span 2000000000"],
    );
    assert_eq!(rect(&tree, items[0]), (0.0, 999.0, 100.0, 1.0));
    assert_eq!((rect(&tree, items[1]).0, rect(&tree, items[1]).1), (0.0, 0.0));
}
