//! Tests for the inline-style markup reader.

use crater::MarkupTree;
use crater::markup::{Token, build_tree, tokenize};
use crater_common::warning::was_warned;
use crater_layout::{Color, Dimension, Display, LayoutTree, NodeId};

fn read(html: &str) -> (LayoutTree, MarkupTree) {
    let mut tree = LayoutTree::new();
    let markup = build_tree(&mut tree, html);
    (tree, markup)
}

fn sorted_ids(markup: &MarkupTree) -> Vec<&str> {
    let mut ids: Vec<&str> = markup.ids.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}

fn lookup(markup: &MarkupTree, id: &str) -> NodeId {
    *markup.ids.get(id).unwrap_or_else(|| panic!("no node '{id}'"))
}

#[test]
fn test_identifiers_follow_id_attribute_or_tag_ordinal() {
    let (tree, markup) = read(
        r#"<div id="main" style="height: 20px"><p>a</p><p id="x">b</p><p>c</p></div>"#,
    );
    assert_eq!(
        sorted_ids(&markup),
        vec!["#text@0", "#text@1", "#text@2", "div#main", "p#x", "p@0", "p@2", "root"]
    );
    let main = lookup(&markup, "div#main");
    assert_eq!(tree.parent(main).unwrap(), Some(markup.root));
    assert_eq!(tree.child_count(main).unwrap(), 3);
    assert_eq!(tree.style(main).unwrap().size.height, Dimension::Points(20.0));
    assert_eq!(tree.display_id(lookup(&markup, "p@2")), "p@2");
}

#[test]
fn test_duplicate_id_falls_back_to_ordinal() {
    let (_, markup) = read(r#"<div id="a"></div><div id="a"></div>"#);
    assert!(markup.ids.contains_key("div#a"));
    assert!(markup.ids.contains_key("div@1"));
}

#[test]
fn test_head_and_raw_text_subtrees_are_skipped() {
    let (tree, markup) = read(
        "<!DOCTYPE html><html><head><title>t</title><style>div { color: red }</style></head>\
         <body><!-- note --><script>if (a < b) {}</script><div></div></body></html>",
    );
    assert_eq!(
        sorted_ids(&markup),
        vec!["body@0", "div@0", "html@0", "root"]
    );
    let body = lookup(&markup, "body@0");
    assert_eq!(tree.children(body).unwrap(), &[lookup(&markup, "div@0")]);
}

#[test]
fn test_void_and_self_closing_elements_take_no_children() {
    let (tree, markup) = read("<div><br><img src=x.png><span/><em>t</em></div>");
    let div = lookup(&markup, "div@0");
    assert_eq!(tree.child_count(div).unwrap(), 4);
    assert_eq!(tree.child_count(lookup(&markup, "br@0")).unwrap(), 0);
    assert_eq!(tree.child_count(lookup(&markup, "span@0")).unwrap(), 0);
    assert_eq!(tree.child_count(lookup(&markup, "em@0")).unwrap(), 1);
}

#[test]
fn test_text_is_collapsed_and_blank_text_dropped() {
    let (tree, markup) = read("<p>  a \n\t b  </p>\n   <p>&lt;b&gt; &amp; c</p>");
    assert_eq!(tree.text(lookup(&markup, "#text@0")).unwrap(), Some("a b"));
    assert_eq!(tree.text(lookup(&markup, "#text@1")).unwrap(), Some("<b> & c"));
    assert_eq!(tree.child_count(markup.root).unwrap(), 2, "whitespace between tags is dropped");
}

#[test]
fn test_text_inherits_font_size_and_color() {
    let (tree, markup) = read(
        r#"<div style="font-size: 10px; color: red; width: 50px"><span>hi</span></div>"#,
    );
    let text = tree.style(lookup(&markup, "#text@0")).unwrap();
    assert_eq!(text.font_size, 10.0);
    assert_eq!(text.color, Some(Color::rgb(255, 0, 0)));
    assert_eq!(text.size.width, Dimension::Auto, "only font-size and color inherit");

    let span = tree.style(lookup(&markup, "span@0")).unwrap();
    assert_eq!(span.font_size, 10.0);
    assert_eq!(span.display, Display::Block);
}

#[test]
fn test_end_tags_close_intervening_elements() {
    let (tree, markup) = read("<section><div><p>x</section><aside></aside>");
    let section = lookup(&markup, "section@0");
    let aside = lookup(&markup, "aside@0");
    assert_eq!(tree.parent(aside).unwrap(), Some(markup.root));
    assert_eq!(tree.child_count(section).unwrap(), 1);
}

#[test]
fn test_stray_end_tag_is_ignored_with_warning() {
    let (tree, markup) = read("<div></span><p></p></div>");
    let div = lookup(&markup, "div@0");
    assert_eq!(tree.child_count(div).unwrap(), 1);
    assert!(was_warned("Markup", "stray end tag </span> ignored"));
}

#[test]
fn test_unclosed_markup_is_tolerated() {
    let (tree, markup) = read("<div><p>text <b");
    assert!(markup.ids.contains_key("p@0"));
    assert!(tree.len() >= 3);
}

#[test]
fn test_tokenize_comment_and_doctype() {
    let tokens = tokenize("<!doctype html><!-- a -- b --><p>x</p>");
    assert_eq!(tokens[0], Token::Doctype);
    assert_eq!(tokens[1], Token::Comment(" a -- b ".to_owned()));
    assert_eq!(tokens[3], Token::Text("x".to_owned()));
    assert_eq!(tokens[4], Token::EndTag { name: "p".to_owned() });
}
