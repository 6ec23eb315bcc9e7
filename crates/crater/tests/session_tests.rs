//! Tests for the session façade: JSON output, mutation and viewport
//! changes.

use crater::{EMPTY_JSON, LayoutSession};
use crater_common::warning::was_warned;
use crater_layout::Dimension;
use serde_json::Value;

const PAGE: &str = r#"
    <div id="a" style="height: 50px; background-color: #00ff00"></div>
    <div id="b" style="height: 30px"><span>label</span></div>
"#;

fn json(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

#[test]
fn test_compute_returns_layout_tree() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    let tree = json(&session.compute_incremental());
    assert_eq!(tree["id"], "root");
    assert_eq!(number(&tree["width"]), 800.0);
    assert_eq!(number(&tree["height"]), 600.0, "auto root takes the viewport");

    let children = tree["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["id"], "div#a");
    assert_eq!(children[1]["id"], "div#b");
    assert_eq!(number(&children[1]["y"]), 50.0);
    assert_eq!(children[1]["children"][0]["id"], "span@0");
}

#[test]
fn test_incremental_json_is_idempotent() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    let first = session.compute_incremental();
    let second = session.compute_incremental();
    assert_eq!(first, second);
    assert_eq!(first, session.compute_full());

    let stats = json(&session.cache_stats());
    assert_eq!(stats["hits"], 0, "the full pass never hits");
    let _ = session.compute_incremental();
    let stats = json(&session.cache_stats());
    assert_eq!(stats["misses"], 0);
    assert_eq!(number(&stats["hitRate"]), 1.0);
}

#[test]
fn test_update_style_merges_and_relayouts() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    let _ = session.compute_incremental();
    assert!(!session.needs_layout());

    assert!(session.update_style("div#a", "margin-left: 5px"));
    assert!(session.update_style("div#a", "height: 70px"));
    assert!(session.needs_layout());

    let tree = json(&session.compute_incremental());
    let a = &tree["children"][0];
    assert_eq!(number(&a["height"]), 70.0);
    assert_eq!(number(&a["x"]), 5.0, "earlier declarations survive");
    assert_eq!(number(&tree["children"][1]["y"]), 70.0);

    let node = session.node_id("div#a").unwrap();
    assert_eq!(
        session.tree().style(node).unwrap().margin.left,
        Dimension::Points(5.0)
    );
}

#[test]
fn test_mark_dirty_recomputes_path_only() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    let _ = session.compute_incremental();
    assert!(session.mark_dirty("span@0"));
    let _ = session.compute_incremental();
    let stats = session.stats();
    assert!(stats.misses >= 3, "span, div#b and root run again");
    assert!(stats.hits >= 1, "div#a is reused");
}

#[test]
fn test_unknown_ids_fail_softly() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    assert!(!session.mark_dirty("div#missing"));
    assert!(!session.update_style("div#missing", "width: 1px"));
    assert_eq!(session.node_id("div#missing"), None);
}

#[test]
fn test_resize_viewport_invalidates_root() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    let _ = session.compute_incremental();
    session.resize_viewport(400.0, 300.0);
    assert!(session.needs_layout());
    let tree = json(&session.compute_incremental());
    assert_eq!(number(&tree["width"]), 400.0);
    assert_eq!(number(&tree["children"][0]["width"]), 400.0);

    session.resize_viewport(-1.0, f64::NAN);
    assert_eq!(session.viewport().width, 0.0);
    assert_eq!(session.viewport().height, 0.0);
}

#[test]
fn test_resize_viewport_same_size_keeps_tree_clean() {
    let mut session = LayoutSession::from_html(PAGE, 640.0, 480.0);
    let _ = session.compute_incremental();
    session.resize_viewport(640.0, 480.0);
    assert!(!session.needs_layout());

    session.resize_viewport(320.0, 480.0);
    assert!(session.needs_layout());
    let missing_root = format!("node {} not found", session.root());
    assert!(!was_warned("Session", &missing_root));
}

#[test]
fn test_paint_tree_carries_visuals() {
    let mut session = LayoutSession::from_html(PAGE, 800.0, 600.0);
    let _ = session.compute_incremental();
    let paint = json(&session.paint_tree());
    assert_eq!(paint["children"][0]["backgroundColor"], "#00ff00");
    assert_eq!(
        paint["children"][1]["children"][0]["children"][0]["text"],
        "label"
    );
}

#[test]
fn test_empty_session_has_only_root() {
    let mut session = LayoutSession::new(100.0, 50.0);
    assert_eq!(session.external_ids(), vec!["root"]);
    let tree = json(&session.compute_incremental());
    assert_eq!(tree["children"].as_array().map(Vec::len), Some(0));
    assert_eq!(number(&tree["height"]), 50.0);
    assert_ne!(session.cache_stats(), EMPTY_JSON);
}
