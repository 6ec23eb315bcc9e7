//! Inline-style markup reader.
//!
//! [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html)
//!
//! A deliberately small subset of HTML: start and end tags with
//! attributes, text, comments, a doctype, void elements and raw text
//! elements. Styling comes only from `style` attributes; there are no
//! stylesheets and no cascade. `font-size` and `color` are the only
//! inherited properties, since text leaves need them for measurement and
//! painting.
//!
//! Every node gets an external identifier:
//! - `tag#id` for elements with a unique `id` attribute,
//! - `tag@n` otherwise, `n` counting elements of that tag in document order,
//! - `#text@n` for text leaves,
//! - `root` for the synthetic root.

use std::collections::HashMap;

use crater_common::warning::warn_once;
use crater_layout::style::parse::apply_declarations;
use crater_layout::{Color, LayoutTree, NodeId, Style};

/// External identifier of the synthetic root.
pub const ROOT_ID: &str = "root";

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified for
/// void elements."
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Elements that generate no layout nodes, together with their subtrees.
const SKIPPED_ELEMENTS: [&str; 5] = ["head", "script", "style", "template", "title"];

/// One token of the markup stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<!DOCTYPE …>`
    Doctype,
    /// `<name attr="value" …>`
    StartTag {
        /// Lowercase tag name.
        name: String,
        /// Attributes in source order, names lowercased, values decoded.
        attributes: Vec<(String, String)>,
        /// Whether the tag ended in `/>`.
        self_closing: bool,
    },
    /// `</name>`
    EndTag {
        /// Lowercase tag name.
        name: String,
    },
    /// Character data with references decoded.
    Text(String),
    /// `<!-- … -->` and bogus comments.
    Comment(String),
}

impl Token {
    /// The value of attribute `name` on a start tag.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// Cursor over the input, in the manner of the tokenizer's "consume the next
/// input character".
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn next_few_characters_are(&self, target: &str) -> bool {
        self.rest()
            .get(..target.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(target))
    }

    fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.input.len());
    }

    fn consume_while(&mut self, mut pred: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// Consume up to and including `terminator`, returning what came
    /// before it. Runs to the end of input when it never appears.
    fn consume_until(&mut self, terminator: &str) -> &'a str {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(i) => {
                self.pos += i + terminator.len();
                &rest[..i]
            }
            None => {
                self.pos = self.input.len();
                rest
            }
        }
    }
}

/// Split markup into tokens.
#[must_use]
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut cursor = Cursor::new(html);
    let mut tokens = Vec::new();

    while !cursor.is_eof() {
        if cursor.next_few_characters_are("<!--") {
            // [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
            cursor.advance(4);
            let comment = cursor.consume_until("-->");
            tokens.push(Token::Comment(comment.to_owned()));
        } else if cursor.next_few_characters_are("<!doctype") {
            let _ = cursor.consume_until(">");
            tokens.push(Token::Doctype);
        } else if cursor.next_few_characters_are("<!") || cursor.next_few_characters_are("<?") {
            // [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
            cursor.advance(2);
            let comment = cursor.consume_until(">");
            tokens.push(Token::Comment(comment.to_owned()));
        } else if cursor.next_few_characters_are("</") {
            // [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
            cursor.advance(2);
            let name = cursor.consume_until(">");
            let name = name.split_whitespace().next().unwrap_or("").to_ascii_lowercase();
            if !name.is_empty() {
                tokens.push(Token::EndTag { name });
            }
        } else if cursor.rest().starts_with('<')
            && cursor.rest()[1..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let _ = cursor.consume();
            let tag = consume_start_tag(&mut cursor);
            if let Token::StartTag {
                name,
                self_closing: false,
                ..
            } = &tag
                && RAW_TEXT_ELEMENTS.contains(&name.as_str())
            {
                // [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
                //
                // Everything up to the matching end tag is text.
                let closing = format!("</{name}");
                let lower = cursor.rest().to_ascii_lowercase();
                let end = lower.find(&closing).unwrap_or(lower.len());
                let raw = &cursor.rest()[..end];
                let name = name.clone();
                tokens.push(tag);
                if !raw.is_empty() {
                    tokens.push(Token::Text(raw.to_owned()));
                }
                cursor.advance(end);
                if !cursor.is_eof() {
                    let _ = cursor.consume_until(">");
                    tokens.push(Token::EndTag { name });
                }
            } else {
                tokens.push(tag);
            }
        } else {
            // [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
            let first = cursor.consume().map(String::from).unwrap_or_default();
            let text = first + cursor.consume_while(|c| c != '<');
            tokens.push(Token::Text(decode_character_references(&text)));
        }
    }
    tokens
}

/// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
/// through [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state).
///
/// The cursor sits just after `<`.
fn consume_start_tag(cursor: &mut Cursor<'_>) -> Token {
    let name = cursor
        .consume_while(|c| !c.is_whitespace() && c != '/' && c != '>')
        .to_ascii_lowercase();
    let mut attributes: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        let _ = cursor.consume_while(char::is_whitespace);
        match cursor.peek() {
            None => break,
            Some('>') => {
                let _ = cursor.consume();
                break;
            }
            Some('/') => {
                let _ = cursor.consume();
                if cursor.peek() == Some('>') {
                    let _ = cursor.consume();
                    self_closing = true;
                    break;
                }
            }
            Some(_) => {
                let attr_name = cursor
                    .consume_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'))
                    .to_ascii_lowercase();
                let _ = cursor.consume_while(char::is_whitespace);
                let value = if cursor.peek() == Some('=') {
                    let _ = cursor.consume();
                    let _ = cursor.consume_while(char::is_whitespace);
                    consume_attribute_value(cursor)
                } else {
                    String::new()
                };
                if attr_name.is_empty() {
                    let _ = cursor.consume();
                    continue;
                }
                // "If there is already an attribute on the token with the
                // exact same name, then this is a duplicate-attribute parse
                // error and the new attribute must be removed from the token."
                if attributes.iter().any(|(n, _)| *n == attr_name) {
                    warn_once("Markup", &format!("duplicate attribute '{attr_name}' on <{name}>"));
                } else {
                    attributes.push((attr_name, value));
                }
            }
        }
    }

    Token::StartTag {
        name,
        attributes,
        self_closing,
    }
}

/// [§ 13.2.5.36-38 Attribute value states](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
fn consume_attribute_value(cursor: &mut Cursor<'_>) -> String {
    let raw = match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            let _ = cursor.consume();
            let mut buf = [0; 4];
            cursor.consume_until(quote.encode_utf8(&mut buf))
        }
        _ => cursor.consume_while(|c| !c.is_whitespace() && c != '>'),
    };
    decode_character_references(raw)
}

/// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
///
/// Decimal and hexadecimal references plus the handful of named references
/// that show up in hand-written markup. Anything else is left verbatim.
#[must_use]
pub fn decode_character_references(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';').filter(|&i| i <= 10) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let reference = &rest[1..semi];
        let decoded = match reference {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => reference
                .strip_prefix("#x")
                .or_else(|| reference.strip_prefix("#X"))
                .map_or_else(
                    || {
                        reference
                            .strip_prefix('#')
                            .and_then(|n| n.parse::<u32>().ok())
                    },
                    |hex| u32::from_str_radix(hex, 16).ok(),
                )
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// A tree built from markup.
#[derive(Debug, Clone)]
pub struct MarkupTree {
    /// The synthetic root every top-level node hangs from.
    pub root: NodeId,
    /// External identifier to node.
    pub ids: HashMap<String, NodeId>,
}

/// An element on the stack of open elements.
struct OpenElement {
    node: NodeId,
    tag: String,
    font_size: f64,
    color: Option<Color>,
}

/// Build layout nodes for `html` inside `tree`.
///
/// Elements default to `display: block`. Text leaves take `font-size` and
/// `color` from their nearest element.
pub fn build_tree(tree: &mut LayoutTree, html: &str) -> MarkupTree {
    let root = tree.create_node(Style::default());
    let _ = tree.set_label(root, None, Some(ROOT_ID.to_owned()));
    let mut ids = HashMap::from([(ROOT_ID.to_owned(), root)]);

    let root_style = Style::default();
    let mut stack = vec![OpenElement {
        node: root,
        tag: String::new(),
        font_size: root_style.font_size,
        color: root_style.color,
    }];
    let mut tag_counts: HashMap<String, usize> = HashMap::new();
    let mut text_count = 0_usize;
    // Name and nesting depth of a skipped subtree.
    let mut skipping: Option<(String, usize)> = None;

    for token in tokenize(html) {
        if let Some((skipped, depth)) = skipping.as_mut() {
            let closed = match &token {
                Token::StartTag {
                    name,
                    self_closing: false,
                    ..
                } if name == skipped => {
                    *depth += 1;
                    false
                }
                Token::EndTag { name } if name == skipped => {
                    let outermost = *depth == 0;
                    *depth = depth.saturating_sub(1);
                    outermost
                }
                _ => false,
            };
            if closed {
                skipping = None;
            }
            continue;
        }

        match token {
            Token::Doctype | Token::Comment(_) => {}
            Token::StartTag {
                ref name,
                self_closing,
                ..
            } => {
                let is_void = VOID_ELEMENTS.contains(&name.as_str());
                if SKIPPED_ELEMENTS.contains(&name.as_str()) {
                    if !self_closing && !is_void {
                        skipping = Some((name.clone(), 0));
                    }
                    continue;
                }
                let Some(parent) = stack.last() else { continue };
                let (parent_node, font_size, color) = (parent.node, parent.font_size, parent.color);

                // Only font-size and color are inherited.
                let mut style = Style {
                    font_size,
                    color,
                    ..Style::default()
                };
                if let Some(css) = token.attribute("style") {
                    apply_declarations(&mut style, css);
                }

                let ordinal = tag_counts.entry(name.clone()).or_insert(0);
                let fallback = format!("{name}@{ordinal}");
                *ordinal += 1;
                let label = match token.attribute("id").map(str::trim) {
                    Some(id) if !id.is_empty() => {
                        let candidate = format!("{name}#{id}");
                        if ids.contains_key(&candidate) {
                            warn_once("Markup", &format!("duplicate id '{candidate}', using '{fallback}'"));
                            fallback
                        } else {
                            candidate
                        }
                    }
                    _ => fallback,
                };

                let (font_size, color) = (style.font_size, style.color);
                let node = tree.create_node(style);
                let _ = tree.set_label(node, Some(name.clone()), Some(label.clone()));
                let _ = tree.add_child(parent_node, node);
                let _ = ids.insert(label, node);

                if !is_void && !self_closing {
                    stack.push(OpenElement {
                        node,
                        tag: name.clone(),
                        font_size,
                        color,
                    });
                }
            }
            Token::EndTag { name } => {
                // [§ 13.2.6.4.7 "any other end tag"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
                //
                // Pop up to and including the matching element; ignore the
                // tag when no such element is open.
                match stack.iter().rposition(|open| open.tag == name) {
                    Some(index) if index > 0 => stack.truncate(index),
                    _ if VOID_ELEMENTS.contains(&name.as_str()) => {}
                    _ => warn_once("Markup", &format!("stray end tag </{name}> ignored")),
                }
            }
            Token::Text(text) => {
                let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if collapsed.is_empty() {
                    continue;
                }
                let Some(parent) = stack.last() else { continue };
                let style = Style {
                    font_size: parent.font_size,
                    color: parent.color,
                    ..Style::default()
                };
                let parent_node = parent.node;
                let label = format!("#text@{text_count}");
                text_count += 1;
                let node = tree.create_text_node(collapsed, style);
                let _ = tree.set_label(node, None, Some(label.clone()));
                let _ = tree.add_child(parent_node, node);
                let _ = ids.insert(label, node);
            }
        }
    }

    MarkupTree { root, ids }
}
