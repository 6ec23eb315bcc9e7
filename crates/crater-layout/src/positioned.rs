//! Relative and absolute positioning.
//!
//! [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
//!
//! Insets follow Yoga's `positionType`: a relative box is shifted after
//! normal-flow layout, an absolute box is removed from flow and placed
//! against its parent's padding box. There is no containing-block search
//! up the tree: the parent is always the containing block.

use crate::box_model::{BoxEdges, ResolvedBox};
use crate::compute::{self, LayoutInput};
use crate::geometry::{Edges, Size};
use crate::style::{AvailableSpace, Dimension};
use crate::tree::{LayoutTree, NodeId};

/// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// "Once a box has been laid out according to the normal flow, it may be
/// shifted relative to its normal position."
///
/// Percent insets resolve against the container's content box.
#[must_use]
pub fn relative_offset(inset: &Edges<Dimension>, container: Size<f64>) -> (f64, f64) {
    let left = inset.left.resolve(Some(container.width));
    let right = inset.right.resolve(Some(container.width));
    let top = inset.top.resolve(Some(container.height));
    let bottom = inset.bottom.resolve(Some(container.height));

    // "If both 'left' and 'right' are 'auto', the used values are both 0."
    // "If 'left' is 'auto', its used value is minus the value of 'right'."
    // "If neither 'left' nor 'right' is 'auto'... the value of 'left' wins."
    let dx = match (left, right) {
        (Some(left), _) => left,
        (None, Some(right)) => -right,
        (None, None) => 0.0,
    };
    // "If neither is 'auto', 'bottom' is ignored."
    let dy = match (top, bottom) {
        (Some(top), _) => top,
        (None, Some(bottom)) => -bottom,
        (None, None) => 0.0,
    };
    (dx, dy)
}

/// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
///
/// "'left' + 'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' + 'right'
/// = width of containing block"
///
/// The containing block is the parent's padding box. With both insets set
/// and an `auto` size the box stretches between them; with an `auto` size
/// otherwise it shrinks to fit. Missing insets put the box at its static
/// position, the start of the parent's content box.
pub(crate) fn layout_absolute_child(
    tree: &mut LayoutTree,
    child: NodeId,
    parent_border_box: Size<f64>,
    parent_edges: &BoxEdges,
) {
    let style = tree.style_snapshot(child);
    let border = parent_edges.border;
    let padding = parent_edges.padding;

    // STEP 1: The containing block is the padding box.
    let cb = Size::new(
        (parent_border_box.width - border.horizontal()).max(0.0),
        (parent_border_box.height - border.vertical()).max(0.0),
    );
    let cb_basis = cb.map(Some);
    let resolved = ResolvedBox::resolve(&style, cb_basis);
    let margin = resolved.edges.margin;

    let left = style.inset.left.resolve(Some(cb.width));
    let right = style.inset.right.resolve(Some(cb.width));
    let top = style.inset.top.resolve(Some(cb.height));
    let bottom = style.inset.bottom.resolve(Some(cb.height));

    // STEP 2: Sizes fixed by the style or by two opposing insets.
    let width = resolved.size.width.or_else(|| match (left, right) {
        (Some(l), Some(r)) => Some(resolved.clamp_width(cb.width - l - r - margin.horizontal())),
        _ => None,
    });
    let height = resolved.size.height.or_else(|| match (top, bottom) {
        (Some(t), Some(b)) => Some(resolved.clamp_height(cb.height - t - b - margin.vertical())),
        _ => None,
    });

    // STEP 3: Shrink-to-fit an auto width:
    // "min(max(preferred minimum width, available width), preferred width)"
    let available_width =
        (cb.width - left.unwrap_or(0.0) - right.unwrap_or(0.0) - margin.horizontal()).max(0.0);
    let width = width.or_else(|| {
        let measure = |tree: &mut LayoutTree, mode: AvailableSpace| {
            compute::compute_node(
                tree,
                child,
                LayoutInput::measure(
                    Size::new(None, height),
                    cb_basis,
                    Size::new(mode, AvailableSpace::Definite(cb.height)),
                ),
            )
            .size
            .width
        };
        let preferred = measure(tree, AvailableSpace::MaxContent);
        let minimum = measure(tree, AvailableSpace::MinContent);
        Some(resolved.clamp_width(preferred.min(available_width.max(minimum))))
    });

    // STEP 4: Lay out with the decided sizes.
    let output = compute::compute_node(
        tree,
        child,
        LayoutInput::perform(
            Size::new(width, height),
            cb_basis,
            Size::new(
                AvailableSpace::Definite(available_width),
                AvailableSpace::Definite(cb.height),
            ),
        ),
    );
    let size = output.size;

    // STEP 5: Solve for the position in padding-box coordinates, then
    // convert to the parent's content-box coordinates.
    let x = match (left, right) {
        (Some(l), _) => l + margin.left,
        (None, Some(r)) => cb.width - r - margin.right - size.width,
        (None, None) => padding.left + margin.left,
    };
    let y = match (top, bottom) {
        (Some(t), _) => t + margin.top,
        (None, Some(b)) => cb.height - b - margin.bottom - size.height,
        (None, None) => padding.top + margin.top,
    };
    compute::place_absolute(tree, child, x - padding.left, y - padding.top);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_wins_over_right() {
        let inset = Edges {
            top: Dimension::Auto,
            right: Dimension::Points(30.0),
            bottom: Dimension::Points(5.0),
            left: Dimension::Points(10.0),
        };
        assert_eq!(relative_offset(&inset, Size::new(100.0, 100.0)), (10.0, -5.0));
    }

    #[test]
    fn test_percent_insets_use_container() {
        let mut inset = Edges::all(Dimension::Auto);
        inset.left = Dimension::Percent(10.0);
        assert_eq!(relative_offset(&inset, Size::new(200.0, 50.0)), (20.0, 0.0));
    }
}
