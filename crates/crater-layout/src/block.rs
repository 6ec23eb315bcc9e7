//! Block flow layout.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."

use crate::box_model::ResolvedBox;
use crate::compute::{self, LayoutInput, LayoutOutput};
use crate::geometry::Size;
use crate::style::{AlignItems, AvailableSpace, Style};
use crate::tree::{LayoutTree, NodeId};

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins.
/// If there are no positive margins, the maximum of the absolute values
/// of the adjoining margins is deducted from zero."
#[must_use]
pub fn collapse_two_margins(a: f64, b: f64) -> f64 {
    if a >= 0.0 && b >= 0.0 {
        a.max(b)
    } else if a < 0.0 && b < 0.0 {
        a.min(b)
    } else {
        a + b
    }
}

/// A child's horizontal offset inside the content box, from auto margins or
/// `align-self`.
///
/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "If both 'margin-left' and 'margin-right' are 'auto', their used values
/// are equal. This horizontally centers the element with respect to the
/// edges of the containing block."
fn inline_offset(free: f64, auto_left: bool, auto_right: bool, align: Option<AlignItems>) -> f64 {
    let free = free.max(0.0);
    match (auto_left, auto_right, align) {
        (true, true, _) | (false, false, Some(AlignItems::Center)) => free / 2.0,
        (true, false, _) | (false, false, Some(AlignItems::FlexEnd)) => free,
        _ => 0.0,
    }
}

/// Lay out a block container.
///
/// Width fills the available space unless fixed; under an intrinsic
/// constraint it shrink-wraps to the widest child. Height is the stacked
/// children's extent unless fixed.
pub(crate) fn compute_block(
    tree: &mut LayoutTree,
    node: NodeId,
    style: &Style,
    input: &LayoutInput,
) -> LayoutOutput {
    let resolved = ResolvedBox::resolve(style, input.parent_size);
    let pb = resolved.padding_border();
    let pb_edges = resolved.edges.padding_border();
    let margin = resolved.edges.margin;

    let children = tree.children_snapshot(node);
    let in_flow: Vec<NodeId> = children
        .iter()
        .copied()
        .filter(|&c| compute::is_in_flow(tree, c))
        .collect();

    let known_height = input.known_dimensions.height.or(resolved.size.height);
    let inner_height = known_height.map(|h| (h - pb.height).max(0.0));

    // STEP 1: Width.
    // [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    //
    // "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    // 'padding-right' + 'border-right-width' + 'margin-right' = width of
    // containing block"
    let width = match input
        .known_dimensions
        .width
        .or(resolved.size.width)
        .or_else(|| {
            input
                .available_space
                .width
                .definite()
                .map(|avail| resolved.clamp_width(avail - margin.horizontal()))
        }) {
        Some(width) => width,
        None => {
            // Shrink-wrap: the widest child margin box under the same
            // intrinsic constraint.
            let mode = input.available_space.width;
            let mut widest: f64 = 0.0;
            for &child in &in_flow {
                let child_style = tree.style_snapshot(child);
                let child_margin =
                    ResolvedBox::resolve(&child_style, Size::new(None, inner_height)).edges.margin;
                let out = compute::compute_node(
                    tree,
                    child,
                    LayoutInput::measure(
                        Size::splat(None),
                        Size::new(None, inner_height),
                        Size::new(mode, AvailableSpace::MaxContent),
                    ),
                );
                widest = widest.max(out.size.width + child_margin.horizontal());
            }
            resolved.clamp_width(widest + pb.width)
        }
    };
    let content_width = (width - pb.width).max(0.0);

    // STEP 2: Stack the children.
    let child_parent_size = Size::new(Some(content_width), inner_height);
    let child_available = Size::new(
        AvailableSpace::Definite(content_width),
        AvailableSpace::from_option(inner_height, AvailableSpace::MaxContent),
    );
    let mut placements = Vec::with_capacity(in_flow.len());
    let mut cursor = 0.0;
    let mut previous_margin_bottom: Option<f64> = None;
    let mut first_baseline = None;
    let mut widest_extent: f64 = 0.0;

    for &child in &in_flow {
        let child_style = tree.style_snapshot(child);
        let child_edges = ResolvedBox::resolve(&child_style, child_parent_size).edges;
        let child_margin = child_edges.margin;
        let child_input = LayoutInput {
            known_dimensions: Size::splat(None),
            parent_size: child_parent_size,
            available_space: child_available,
            run_mode: input.run_mode,
        };
        let out = compute::compute_node(tree, child, child_input);

        let free = content_width - out.size.width - child_margin.horizontal();
        let x = child_margin.left
            + inline_offset(
                free,
                child_edges.margin_auto.left,
                child_edges.margin_auto.right,
                child_style.align_self,
            );

        // [§ 8.3.1](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
        //
        // "bottom margin of box and top margin of its next in-flow following
        // sibling" are adjoining.
        let y = match previous_margin_bottom {
            None => child_margin.top,
            Some(prev) => cursor + collapse_two_margins(prev, child_margin.top),
        };
        cursor = y + out.size.height;
        previous_margin_bottom = Some(child_margin.bottom);
        widest_extent = widest_extent.max(x + out.size.width + child_margin.right);

        if first_baseline.is_none()
            && let Some(baseline) = out.first_baseline
        {
            first_baseline = Some(pb_edges.top + y + baseline);
        }
        placements.push((child, x, y));
    }
    let content_height = (cursor + previous_margin_bottom.unwrap_or(0.0)).max(0.0);

    // STEP 3: Height.
    // [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    //
    // "If 'height' is 'auto', the height depends on whether the element has
    // any block-level children... the bottom edge of the bottom (possibly
    // collapsed) margin of its last in-flow child."
    let height = known_height.unwrap_or_else(|| resolved.clamp_height(content_height + pb.height));
    let size = Size::new(width, height);

    // STEP 4: Commit positions.
    if input.is_perform() {
        let content = resolved.content_size(size);
        for (child, x, y) in placements {
            compute::place_child(tree, child, x, y, content);
        }
        compute::layout_out_of_flow_children(tree, &children, size, &resolved.edges);
    }

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[BLOCK] {node} size={}x{} children={}",
        size.width,
        size.height,
        in_flow.len()
    );

    LayoutOutput {
        size,
        content_size: Size::new(widest_extent, content_height),
        first_baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_two_margins() {
        assert_eq!(collapse_two_margins(20.0, 30.0), 30.0);
        assert_eq!(collapse_two_margins(-10.0, -25.0), -25.0);
        assert_eq!(collapse_two_margins(30.0, -10.0), 20.0);
        assert_eq!(collapse_two_margins(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_inline_offset_prefers_auto_margins() {
        assert_eq!(inline_offset(100.0, true, true, Some(AlignItems::FlexEnd)), 50.0);
        assert_eq!(inline_offset(100.0, true, false, None), 100.0);
        assert_eq!(inline_offset(100.0, false, false, Some(AlignItems::Center)), 50.0);
        assert_eq!(inline_offset(-40.0, true, true, None), 0.0);
    }
}
