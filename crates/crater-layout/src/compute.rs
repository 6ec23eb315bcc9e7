//! Layout pass orchestration.
//!
//! A pass walks the tree top-down. Each visit goes through
//! [`compute_node`], which consults the node's cache slots, dispatches to
//! the block, flex or grid algorithm on a miss, and stores the result.
//! Algorithms call back into [`compute_node`] for their children, either to
//! measure them ([`RunMode::ComputeSize`]) or to lay them out for real
//! ([`RunMode::PerformLayout`]), and then position them with
//! [`place_child`].

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

use serde::Serialize;

use crate::block;
use crate::box_model::{BoxEdges, LayoutResult, ResolvedBox};
use crate::error::LayoutError;
use crate::flex;
use crate::geometry::Size;
use crate::grid;
use crate::positioned;
use crate::style::{AvailableSpace, Display, Position};
use crate::text;
use crate::tree::{LayoutTree, NodeId};

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Whether a visit only needs the node's size or must also position its
/// descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RunMode {
    /// Measure only; descendants' layout results are left untouched.
    ComputeSize,
    /// Final layout; descendants are positioned and their results written.
    PerformLayout,
}

/// The constraints a parent hands to a child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInput {
    /// Border-box sizes the parent has already decided.
    pub known_dimensions: Size<Option<f64>>,
    /// The parent's content-box size, the basis for percentages.
    pub parent_size: Size<Option<f64>>,
    /// Space available to the child's margin box.
    pub available_space: Size<AvailableSpace>,
    /// Measure or lay out.
    pub run_mode: RunMode,
}

impl LayoutInput {
    /// A measurement request.
    #[must_use]
    pub const fn measure(
        known_dimensions: Size<Option<f64>>,
        parent_size: Size<Option<f64>>,
        available_space: Size<AvailableSpace>,
    ) -> Self {
        Self {
            known_dimensions,
            parent_size,
            available_space,
            run_mode: RunMode::ComputeSize,
        }
    }

    /// A final layout request.
    #[must_use]
    pub const fn perform(
        known_dimensions: Size<Option<f64>>,
        parent_size: Size<Option<f64>>,
        available_space: Size<AvailableSpace>,
    ) -> Self {
        Self {
            known_dimensions,
            parent_size,
            available_space,
            run_mode: RunMode::PerformLayout,
        }
    }

    /// Whether descendants must be positioned.
    #[must_use]
    pub fn is_perform(&self) -> bool {
        self.run_mode == RunMode::PerformLayout
    }
}

/// What a visit reports back to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    /// Border-box size.
    pub size: Size<f64>,
    /// Extent of the in-flow content, for overflow.
    pub content_size: Size<f64>,
    /// Distance from the border-box top to the first baseline, if any.
    pub first_baseline: Option<f64>,
}

impl LayoutTree {
    /// Lay out the subtree rooted at `root` inside a viewport, reusing every
    /// cache slot that is still valid.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `root` is not live.
    pub fn compute_layout(&mut self, root: NodeId, viewport: Size<f64>) -> Result<(), LayoutError> {
        self.run_pass(root, viewport, true)
    }

    /// Lay out the subtree rooted at `root` from scratch: every cache slot
    /// is cleared, none is consulted, and all are repopulated.
    ///
    /// # Errors
    /// [`LayoutError::NodeNotFound`] if `root` is not live.
    pub fn compute_layout_full(
        &mut self,
        root: NodeId,
        viewport: Size<f64>,
    ) -> Result<(), LayoutError> {
        self.run_pass(root, viewport, false)
    }

    fn run_pass(
        &mut self,
        root: NodeId,
        viewport: Size<f64>,
        use_cache: bool,
    ) -> Result<(), LayoutError> {
        let style = self.node(root)?.style().clone();
        self.stats.reset();
        if !use_cache {
            let ids: Vec<NodeId> = self.node_ids().collect();
            for id in ids {
                if let Some(node) = self.get_mut(id) {
                    node.cache.clear();
                }
            }
        }
        self.use_cache = use_cache;

        // The root takes the viewport size exactly unless its style says
        // otherwise.
        let viewport = viewport.map(|v| v.max(0.0));
        let basis = viewport.map(Some);
        let resolved = ResolvedBox::resolve(&style, basis);
        let margin = resolved.edges.margin;
        let known = Size {
            width: Some(resolved.size.width.unwrap_or_else(|| {
                resolved.clamp_width((viewport.width - margin.horizontal()).max(0.0))
            })),
            height: Some(resolved.size.height.unwrap_or_else(|| {
                resolved.clamp_height((viewport.height - margin.vertical()).max(0.0))
            })),
        };
        let input = LayoutInput::perform(
            known,
            basis,
            viewport.map(AvailableSpace::Definite),
        );

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT PASS] root={root} viewport={}x{} cache={use_cache}",
            viewport.width, viewport.height
        );

        let _ = compute_node(self, root, input);
        place_child(self, root, margin.left, margin.top, viewport);
        self.use_cache = true;

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT PASS] done hits={} misses={} nodes={}",
            self.stats.hits, self.stats.misses, self.stats.nodes_computed
        );
        Ok(())
    }
}

/// Visit one node: answer from the cache when possible, otherwise run the
/// algorithm for its display type and remember the result.
pub(crate) fn compute_node(tree: &mut LayoutTree, node: NodeId, input: LayoutInput) -> LayoutOutput {
    let Some(generation) = tree.get(node).map(|n| n.style_generation) else {
        return LayoutOutput::default();
    };

    if tree.use_cache
        && let Some(output) = tree.get(node).and_then(|n| n.cache.get(&input, generation))
    {
        tree.stats.record_hit();
        return output;
    }
    tree.stats.record_miss();

    #[cfg(feature = "layout-trace")]
    let _depth = {
        let depth = LAYOUT_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });
        eprintln!(
            "[LAYOUT] {:indent$}{node} mode={} known={:?} avail={:?}",
            "",
            input.run_mode,
            input.known_dimensions,
            input.available_space,
            indent = depth * 2
        );
        struct DepthGuard;
        impl Drop for DepthGuard {
            fn drop(&mut self) {
                LAYOUT_DEPTH.with(|d| d.set(d.get() - 1));
            }
        }
        DepthGuard
    };

    let output = dispatch(tree, node, &input);

    let capacity = tree.config.measure_cache_slots;
    if let Some(n) = tree.get_mut(node) {
        n.cache.store(&input, output, generation, capacity);
        if input.is_perform() {
            n.dirty = false;
        }
    }
    output
}

fn dispatch(tree: &mut LayoutTree, node: NodeId, input: &LayoutInput) -> LayoutOutput {
    let style = tree.style_snapshot(node);

    // [§ 2.5 Box Generation](https://www.w3.org/TR/css-display-3/#box-generation)
    //
    // "display: none: The element and its descendants generate no boxes or
    // text runs."
    if style.is_hidden() {
        if input.is_perform() {
            hide_subtree(tree, node);
        }
        return LayoutOutput::default();
    }

    let leaf_text = tree
        .get(node)
        .filter(|n| n.children.is_empty())
        .and_then(|n| n.text.clone());
    let output = match (leaf_text, style.display) {
        (Some(text), _) => text::compute_text_leaf(tree.metrics.as_ref(), &text, &style, *input),
        (None, Display::Block | Display::None) => block::compute_block(tree, node, &style, input),
        (None, Display::Flex) => flex::compute_flexbox(tree, node, &style, input),
        (None, Display::Grid) => grid::compute_grid(tree, node, &style, input),
    };

    if input.is_perform() {
        let edges = ResolvedBox::resolve(&style, input.parent_size).edges;
        record_size(tree, node, output.size, &edges);
    }
    output
}

/// Write a node's size and edges, raising `has_new_layout` on change.
fn record_size(tree: &mut LayoutTree, node: NodeId, size: Size<f64>, edges: &BoxEdges) {
    let Some(n) = tree.get_mut(node) else { return };
    let updated = LayoutResult {
        x: n.layout.x,
        y: n.layout.y,
        width: size.width.max(0.0),
        height: size.height.max(0.0),
        margin: edges.margin,
        border: edges.border,
        padding: edges.padding,
    };
    if updated != n.layout {
        n.layout = updated;
        n.has_new_layout = true;
    }
}

/// Write a node's position, raising `has_new_layout` on change.
fn record_position(tree: &mut LayoutTree, node: NodeId, x: f64, y: f64) {
    let Some(n) = tree.get_mut(node) else { return };
    if n.layout.x != x || n.layout.y != y {
        n.layout.x = x;
        n.layout.y = y;
        n.has_new_layout = true;
    }
}

/// Position an in-flow child's border box at `(x, y)` inside the parent's
/// content box, then apply its relative offsets.
pub(crate) fn place_child(
    tree: &mut LayoutTree,
    child: NodeId,
    x: f64,
    y: f64,
    container_content: Size<f64>,
) {
    let Some((position, inset)) = tree.get(child).map(|n| (n.style.position, n.style.inset)) else {
        return;
    };
    let (dx, dy) = match position {
        Position::Relative => positioned::relative_offset(&inset, container_content),
        Position::Absolute => (0.0, 0.0),
    };
    record_position(tree, child, x + dx, y + dy);
}

/// Zero the layout of a `display: none` subtree and mark it clean.
fn hide_subtree(tree: &mut LayoutTree, node: NodeId) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        record_size(tree, current, Size::ZERO, &BoxEdges::default());
        record_position(tree, current, 0.0, 0.0);
        if let Some(n) = tree.get_mut(current) {
            n.dirty = false;
            stack.extend(n.children.iter().copied());
        }
    }
}

/// Lay out the children an algorithm skipped: `display: none` children
/// are zeroed and absolutely positioned children are placed against the
/// padding box.
pub(crate) fn layout_out_of_flow_children(
    tree: &mut LayoutTree,
    children: &[NodeId],
    border_box: Size<f64>,
    edges: &BoxEdges,
) {
    let content = Size::new(
        (border_box.width - edges.padding_border_sum().width).max(0.0),
        (border_box.height - edges.padding_border_sum().height).max(0.0),
    );
    for &child in children {
        let Some(style) = tree.get(child).map(|n| (n.style.display, n.style.position)) else {
            continue;
        };
        match style {
            (Display::None, _) => {
                let input = LayoutInput::perform(
                    Size::splat(None),
                    content.map(Some),
                    Size::splat(AvailableSpace::Definite(0.0)),
                );
                let _ = compute_node(tree, child, input);
            }
            (_, Position::Absolute) => {
                positioned::layout_absolute_child(tree, child, border_box, edges);
            }
            (_, Position::Relative) => {}
        }
    }
}

/// Set an absolutely positioned child's final position. `(x, y)` is
/// relative to the parent's content box.
pub(crate) fn place_absolute(tree: &mut LayoutTree, child: NodeId, x: f64, y: f64) {
    record_position(tree, child, x, y);
}

/// Whether a child participates in its parent's flow.
pub(crate) fn is_in_flow(tree: &LayoutTree, child: NodeId) -> bool {
    tree.get(child)
        .is_some_and(|n| !n.style.is_hidden() && !n.style.is_absolute())
}
