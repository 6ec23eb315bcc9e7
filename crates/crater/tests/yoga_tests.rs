//! Tests for the Yoga-style mutation surface.

use crater::{Edge, Gutter, LayoutSession};
use crater_common::warning::was_warned;
use crater_layout::{Dimension, FlexDirection, JustifyContent};

/// root > row(flex row, height 100) > a, b, c (grow 1 each)
fn row_of_three() -> LayoutSession {
    let mut session = LayoutSession::new(300.0, 200.0);
    assert!(session.create_node("row"));
    assert!(session.set_flex_direction("row", FlexDirection::Row));
    assert!(session.set_height("row", Dimension::Points(100.0)));
    assert!(session.insert_child("root", "row", 0));
    for (index, id) in ["a", "b", "c"].into_iter().enumerate() {
        assert!(session.create_node(id));
        assert!(session.set_flex_grow(id, 1.0));
        assert!(session.insert_child("row", id, index));
    }
    assert!(session.calculate_layout(300.0, 200.0));
    session
}

#[test]
fn test_grow_distributes_row() {
    let session = row_of_three();
    assert_eq!(session.get_computed_width("row"), 300.0);
    for (id, left) in [("a", 0.0), ("b", 100.0), ("c", 200.0)] {
        assert_eq!(session.get_computed_left(id), left, "left of {id}");
        assert_eq!(session.get_computed_width(id), 100.0, "width of {id}");
        assert_eq!(session.get_computed_height(id), 100.0, "{id} stretches");
        assert_eq!(session.get_computed_top(id), 0.0);
    }
}

#[test]
fn test_new_nodes_use_yoga_defaults() {
    let mut session = LayoutSession::new(100.0, 100.0);
    assert!(session.create_node("n"));
    let node = session.node_id("n").unwrap();
    let style = session.tree().style(node).unwrap();
    assert_eq!(style.flex_direction, FlexDirection::Column);
    assert_eq!(style.flex_shrink, 0.0);
    assert_eq!(style.align_content, JustifyContent::FlexStart);

    assert!(!session.create_node("n"), "ids are unique");
    assert!(!session.create_node(""));
}

#[test]
fn test_unknown_ids_fail_softly() {
    let mut session = row_of_three();
    assert!(!session.set_width("ghost", Dimension::Points(1.0)));
    assert!(!session.set_margin("ghost", Edge::All, Dimension::ZERO));
    assert!(!session.insert_child("row", "ghost", 0));
    assert!(!session.insert_child("ghost", "a", 0));
    assert!(!session.remove_child("row", "ghost"));
    assert!(!session.destroy_node("ghost"));
    assert!(!session.has_new_layout("ghost"));
    assert!(!session.mark_layout_seen("ghost"));
    assert_eq!(session.get_computed_width("ghost"), 0.0);
    assert_eq!(session.get_computed_margin("ghost", Edge::Left), 0.0);
    assert_eq!(session.get_child_count("ghost"), 0);
}

#[test]
fn test_structural_errors_are_rejected() {
    let mut session = row_of_three();
    assert!(!session.insert_child("a", "row", 0), "cycle");
    assert!(!session.insert_child("row", "a", 9), "index past end");
    assert!(!session.remove_child("a", "b"), "not a child");
}

#[test]
fn test_remove_and_reinsert_child() {
    let mut session = row_of_three();
    assert!(session.remove_child("row", "b"));
    assert_eq!(session.get_child_count("row"), 2);
    assert!(session.insert_child("row", "b", 0));
    assert!(session.calculate_layout(300.0, 200.0));
    assert_eq!(session.get_computed_left("b"), 0.0);
    assert_eq!(session.get_computed_left("a"), 100.0);
}

#[test]
fn test_destroy_node_removes_subtree_and_ids() {
    let mut session = row_of_three();
    assert!(!session.destroy_node("root"));
    assert!(session.destroy_node("row"));
    assert_eq!(session.get_child_count("root"), 0);
    assert_eq!(session.node_id("a"), None);
    assert_eq!(session.external_ids(), vec!["root"]);
    assert!(session.create_node("a"), "the name is free again");
}

#[test]
fn test_spacing_setters_and_getters() {
    let mut session = row_of_three();
    assert!(session.set_margin("a", Edge::All, Dimension::Points(5.0)));
    assert!(session.set_padding("b", Edge::Horizontal, Dimension::Points(4.0)));
    assert!(session.set_border("c", Edge::Top, 2.0));
    assert!(session.calculate_layout(300.0, 200.0));

    assert_eq!(session.get_computed_margin("a", Edge::Left), 5.0);
    assert_eq!(session.get_computed_margin("a", Edge::Bottom), 5.0);
    assert_eq!(session.get_computed_margin("a", Edge::All), 0.0, "compound edges read 0");
    assert_eq!(session.get_computed_padding("b", Edge::Start), 4.0);
    assert_eq!(session.get_computed_padding("b", Edge::Top), 0.0);
    assert_eq!(session.get_computed_border("c", Edge::Top), 2.0);
    assert_eq!(session.get_computed_top("a"), 5.0);
}

#[test]
fn test_negative_padding_clamps_with_warning() {
    let mut session = row_of_three();
    assert!(session.set_padding("a", Edge::Top, Dimension::Points(-3.0)));
    let node = session.node_id("a").unwrap();
    assert_eq!(session.tree().style(node).unwrap().padding.top, Dimension::ZERO);
    assert!(was_warned("Yoga", "negative padding '-3', using 0"));
}

#[test]
fn test_gap_setter() {
    let mut session = row_of_three();
    assert!(session.set_gap("row", Gutter::Column, Dimension::Points(30.0)));
    assert!(session.calculate_layout(300.0, 200.0));
    assert_eq!(session.get_computed_width("a"), 80.0);
    assert_eq!(session.get_computed_left("b"), 110.0);
}

#[test]
fn test_has_new_layout_handshake() {
    let mut session = row_of_three();
    assert!(session.has_new_layout("a"));
    for id in ["root", "row", "a", "b", "c"] {
        assert!(session.mark_layout_seen(id));
    }
    assert!(session.calculate_layout(300.0, 200.0));
    assert!(!session.has_new_layout("a"), "nothing changed");

    assert!(session.set_width("a", Dimension::Points(50.0)));
    assert!(session.calculate_layout(300.0, 200.0));
    assert!(session.has_new_layout("a"));
    assert!(session.has_new_layout("b"), "siblings move");
}
