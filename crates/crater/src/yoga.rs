//! Yoga-compatible mutation surface.
//!
//! Mirrors the per-node setters and computed-value getters of the Yoga
//! flex layout library, addressed by external identifier. Every setter
//! marks the node dirty and reports whether the node was found; every
//! getter returns `0.0` for an unknown node.
//!
//! Nodes created here follow Yoga's defaults rather than CSS's:
//! `display: flex`, `flex-direction: column`, `flex-shrink: 0` and
//! `align-content: flex-start`.

use crater_common::warning::warn_once;
use crater_layout::{
    AlignItems, BoxSizing, Dimension, Display, Edges, FlexDirection, FlexWrap, JustifyContent,
    LayoutResult, Position, Style,
};

use crate::session::LayoutSession;

/// A side, or group of sides, of a box.
///
/// `Start` and `End` are the inline-start and inline-end sides; only
/// left-to-right text is supported, so they map to `Left` and `Right`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Edge {
    /// The left side.
    Left,
    /// The top side.
    Top,
    /// The right side.
    Right,
    /// The bottom side.
    Bottom,
    /// The inline-start side.
    Start,
    /// The inline-end side.
    End,
    /// Left and right.
    Horizontal,
    /// Top and bottom.
    Vertical,
    /// Every side.
    All,
}

impl Edge {
    /// Write `value` to every side this edge names.
    pub fn apply<T: Copy>(self, edges: &mut Edges<T>, value: T) {
        match self {
            Self::Left | Self::Start => edges.left = value,
            Self::Top => edges.top = value,
            Self::Right | Self::End => edges.right = value,
            Self::Bottom => edges.bottom = value,
            Self::Horizontal => {
                edges.left = value;
                edges.right = value;
            }
            Self::Vertical => {
                edges.top = value;
                edges.bottom = value;
            }
            Self::All => *edges = Edges::all(value),
        }
    }

    /// Read the side this edge names; `None` for compound edges.
    #[must_use]
    pub const fn read<T: Copy>(self, edges: &Edges<T>) -> Option<T> {
        match self {
            Self::Left | Self::Start => Some(edges.left),
            Self::Top => Some(edges.top),
            Self::Right | Self::End => Some(edges.right),
            Self::Bottom => Some(edges.bottom),
            Self::Horizontal | Self::Vertical | Self::All => None,
        }
    }
}

/// Which gap a gutter setter targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Gutter {
    /// `column-gap`, between columns.
    Column,
    /// `row-gap`, between rows.
    Row,
    /// Both gaps.
    All,
}

/// The style a Yoga node starts with.
#[must_use]
pub fn yoga_default_style() -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Column,
        flex_shrink: 0.0,
        align_content: JustifyContent::FlexStart,
        ..Style::default()
    }
}

/// Negative lengths become zero, with a warning naming `property`.
fn non_negative(property: &str, value: Dimension) -> Dimension {
    match value {
        Dimension::Points(v) | Dimension::Percent(v) if v < 0.0 || v.is_nan() => {
            warn_once("Yoga", &format!("negative {property} '{v}', using 0"));
            Dimension::ZERO
        }
        other => other,
    }
}

fn non_negative_factor(property: &str, value: f64) -> f64 {
    if value >= 0.0 && value.is_finite() {
        value
    } else {
        warn_once("Yoga", &format!("invalid {property} '{value}', using 0"));
        0.0
    }
}

impl LayoutSession {
    // ===== Tree building =====

    /// Create a detached node named `id` with Yoga's default style.
    ///
    /// Fails when the name is empty or already taken.
    pub fn create_node(&mut self, id: &str) -> bool {
        if id.is_empty() || self.node_id(id).is_some() {
            return false;
        }
        let node = self.tree.create_node(yoga_default_style());
        if let Err(err) = self.tree.set_label(node, None, Some(id.to_owned())) {
            warn_once("Yoga", &err.to_string());
            return false;
        }
        let _ = self.ids.insert(id.to_owned(), node);
        true
    }

    /// Insert `child` into `parent` at `index`, detaching it from any
    /// previous parent.
    pub fn insert_child(&mut self, parent: &str, child: &str, index: usize) -> bool {
        let (Some(parent), Some(child)) = (self.node_id(parent), self.node_id(child)) else {
            return false;
        };
        self.tree.insert_child(parent, child, index).is_ok()
    }

    /// Detach `child` from `parent`. The child survives and may be inserted
    /// elsewhere.
    pub fn remove_child(&mut self, parent: &str, child: &str) -> bool {
        let (Some(parent), Some(child)) = (self.node_id(parent), self.node_id(child)) else {
            return false;
        };
        self.tree.remove_child_node(parent, child).is_ok()
    }

    /// Number of children of `id`; `0` when unknown.
    #[must_use]
    pub fn get_child_count(&self, id: &str) -> usize {
        self.node_id(id)
            .and_then(|node| self.tree.child_count(node).ok())
            .unwrap_or(0)
    }

    /// Destroy `id` and its subtree. The root cannot be destroyed.
    pub fn destroy_node(&mut self, id: &str) -> bool {
        if self.is_root(id) {
            return false;
        }
        let Some(node) = self.node_id(id) else {
            return false;
        };
        let destroyed = self.tree.destroy_node(node).is_ok();
        self.prune_ids();
        destroyed
    }

    /// Lay out against an owner of `width` × `height`.
    pub fn calculate_layout(&mut self, width: f64, height: f64) -> bool {
        self.resize_viewport(width, height);
        self.tree.compute_layout(self.root, self.viewport).is_ok()
    }

    // ===== Sizing =====

    /// `width`
    pub fn set_width(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("width", value);
        self.edit_style(id, |s| s.size.width = value)
    }

    /// `height`
    pub fn set_height(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("height", value);
        self.edit_style(id, |s| s.size.height = value)
    }

    /// `min-width`
    pub fn set_min_width(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("min-width", value);
        self.edit_style(id, |s| s.min_size.width = value)
    }

    /// `min-height`
    pub fn set_min_height(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("min-height", value);
        self.edit_style(id, |s| s.min_size.height = value)
    }

    /// `max-width`
    pub fn set_max_width(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("max-width", value);
        self.edit_style(id, |s| s.max_size.width = value)
    }

    /// `max-height`
    pub fn set_max_height(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("max-height", value);
        self.edit_style(id, |s| s.max_size.height = value)
    }

    /// `box-sizing`
    pub fn set_box_sizing(&mut self, id: &str, value: BoxSizing) -> bool {
        self.edit_style(id, |s| s.box_sizing = value)
    }

    // ===== Flex =====

    /// `flex-direction`
    pub fn set_flex_direction(&mut self, id: &str, value: FlexDirection) -> bool {
        self.edit_style(id, |s| s.flex_direction = value)
    }

    /// `flex-wrap`
    pub fn set_flex_wrap(&mut self, id: &str, value: FlexWrap) -> bool {
        self.edit_style(id, |s| s.flex_wrap = value)
    }

    /// `flex-grow`
    pub fn set_flex_grow(&mut self, id: &str, value: f64) -> bool {
        let value = non_negative_factor("flex-grow", value);
        self.edit_style(id, |s| s.flex_grow = value)
    }

    /// `flex-shrink`
    pub fn set_flex_shrink(&mut self, id: &str, value: f64) -> bool {
        let value = non_negative_factor("flex-shrink", value);
        self.edit_style(id, |s| s.flex_shrink = value)
    }

    /// `flex-basis`
    pub fn set_flex_basis(&mut self, id: &str, value: Dimension) -> bool {
        let value = non_negative("flex-basis", value);
        self.edit_style(id, |s| s.flex_basis = value)
    }

    /// `order`
    pub fn set_order(&mut self, id: &str, value: i32) -> bool {
        self.edit_style(id, |s| s.order = value)
    }

    // ===== Alignment =====

    /// `justify-content`
    pub fn set_justify_content(&mut self, id: &str, value: JustifyContent) -> bool {
        self.edit_style(id, |s| s.justify_content = value)
    }

    /// `align-items`
    pub fn set_align_items(&mut self, id: &str, value: AlignItems) -> bool {
        self.edit_style(id, |s| s.align_items = value)
    }

    /// `align-self`; `None` is `auto`.
    pub fn set_align_self(&mut self, id: &str, value: Option<AlignItems>) -> bool {
        self.edit_style(id, |s| s.align_self = value)
    }

    /// `align-content`
    pub fn set_align_content(&mut self, id: &str, value: JustifyContent) -> bool {
        self.edit_style(id, |s| s.align_content = value)
    }

    // ===== Spacing =====

    /// `margin-*`. Margins may be negative.
    pub fn set_margin(&mut self, id: &str, edge: Edge, value: Dimension) -> bool {
        self.edit_style(id, |s| edge.apply(&mut s.margin, value))
    }

    /// `padding-*`
    pub fn set_padding(&mut self, id: &str, edge: Edge, value: Dimension) -> bool {
        let value = non_negative("padding", value);
        self.edit_style(id, |s| edge.apply(&mut s.padding, value))
    }

    /// `border-*-width`, in points.
    pub fn set_border(&mut self, id: &str, edge: Edge, value: f64) -> bool {
        let value = non_negative("border", Dimension::Points(value));
        self.edit_style(id, |s| edge.apply(&mut s.border, value))
    }

    /// `row-gap` / `column-gap`
    pub fn set_gap(&mut self, id: &str, gutter: Gutter, value: Dimension) -> bool {
        let value = non_negative("gap", value);
        self.edit_style(id, |s| match gutter {
            Gutter::Column => s.gap.width = value,
            Gutter::Row => s.gap.height = value,
            Gutter::All => {
                s.gap.width = value;
                s.gap.height = value;
            }
        })
    }

    // ===== Display and positioning =====

    /// `display`
    pub fn set_display(&mut self, id: &str, value: Display) -> bool {
        self.edit_style(id, |s| s.display = value)
    }

    /// `position`
    pub fn set_position_type(&mut self, id: &str, value: Position) -> bool {
        self.edit_style(id, |s| s.position = value)
    }

    /// `top` / `right` / `bottom` / `left`. Insets may be negative.
    pub fn set_position(&mut self, id: &str, edge: Edge, value: Dimension) -> bool {
        self.edit_style(id, |s| edge.apply(&mut s.inset, value))
    }

    // ===== Computed values =====

    fn computed(&self, id: &str) -> Option<&LayoutResult> {
        self.node_id(id).and_then(|node| self.tree.layout(node).ok())
    }

    /// Border-box left edge relative to the parent's content box.
    #[must_use]
    pub fn get_computed_left(&self, id: &str) -> f64 {
        self.computed(id).map_or(0.0, |l| l.x)
    }

    /// Border-box top edge relative to the parent's content box.
    #[must_use]
    pub fn get_computed_top(&self, id: &str) -> f64 {
        self.computed(id).map_or(0.0, |l| l.y)
    }

    /// Border-box width.
    #[must_use]
    pub fn get_computed_width(&self, id: &str) -> f64 {
        self.computed(id).map_or(0.0, |l| l.width)
    }

    /// Border-box height.
    #[must_use]
    pub fn get_computed_height(&self, id: &str) -> f64 {
        self.computed(id).map_or(0.0, |l| l.height)
    }

    /// Used margin on one side; `0.0` for compound edges.
    #[must_use]
    pub fn get_computed_margin(&self, id: &str, edge: Edge) -> f64 {
        self.computed(id)
            .and_then(|l| edge.read(&l.margin))
            .unwrap_or(0.0)
    }

    /// Used padding on one side; `0.0` for compound edges.
    #[must_use]
    pub fn get_computed_padding(&self, id: &str, edge: Edge) -> f64 {
        self.computed(id)
            .and_then(|l| edge.read(&l.padding))
            .unwrap_or(0.0)
    }

    /// Used border width on one side; `0.0` for compound edges.
    #[must_use]
    pub fn get_computed_border(&self, id: &str, edge: Edge) -> f64 {
        self.computed(id)
            .and_then(|l| edge.read(&l.border))
            .unwrap_or(0.0)
    }

    // ===== Change handshake =====

    /// Whether the layout of `id` changed since it was last acknowledged.
    #[must_use]
    pub fn has_new_layout(&self, id: &str) -> bool {
        self.node_id(id)
            .is_some_and(|node| self.tree.has_new_layout(node).unwrap_or(false))
    }

    /// Acknowledge the current layout of `id`.
    pub fn mark_layout_seen(&mut self, id: &str) -> bool {
        self.node_id(id)
            .is_some_and(|node| self.tree.mark_layout_seen(node).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_apply_and_read() {
        let mut edges = Edges::all(0.0);
        Edge::Horizontal.apply(&mut edges, 3.0);
        Edge::Top.apply(&mut edges, 1.0);
        assert_eq!(edges, Edges { top: 1.0, right: 3.0, bottom: 0.0, left: 3.0 });
        assert_eq!(Edge::Start.read(&edges), Some(3.0));
        assert_eq!(Edge::All.read(&edges), None);
    }

    #[test]
    fn test_edge_names() {
        assert_eq!("horizontal".parse::<Edge>(), Ok(Edge::Horizontal));
        assert_eq!(Gutter::Column.to_string(), "column");
    }
}
