//! CSS Flexbox Layout Algorithm.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Supports both axes and their reverses, `flex-wrap` including
//! `wrap-reverse`, `order`, min/max clamping with the automatic minimum
//! size, `justify-content`, `align-items`/`align-self` with baseline
//! alignment, `align-content`, auto margins and gaps.

use crate::box_model::{ResolvedBox, clamp_size, to_border_box};
use crate::compute::{self, LayoutInput, LayoutOutput};
use crate::geometry::{EPSILON, Edges, Size};
use crate::style::{
    AlignItems, AvailableSpace, Dimension, FlexWrap, JustifyContent, Overflow, Style,
};
use crate::tree::{LayoutTree, NodeId};

/// Per-item data collected during flex layout.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
#[derive(Debug, Clone)]
struct FlexItem {
    node: NodeId,
    order: i32,
    align_self: AlignItems,
    margin: Edges<f64>,
    margin_auto: Edges<bool>,
    padding_border: Size<f64>,
    /// Specified border-box size, `None` for `auto`.
    size: Size<Option<f64>>,
    min_size: Size<Option<f64>>,
    max_size: Size<Option<f64>>,
    /// `flex-basis` resolved to a border-box size, `None` for `auto`/`content`.
    explicit_basis: Option<f64>,
    /// Whether `min-*` on the main axis is `auto` with visible overflow, so
    /// the automatic minimum size applies.
    auto_min_main: bool,
    grow: f64,
    shrink: f64,

    /// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    /// The flex base size.
    base_size: f64,
    /// The used main-axis minimum, including the automatic minimum.
    min_main: f64,
    /// The base size clamped by min/max.
    hypothetical_main: f64,
    /// The resolved main size after § 9.7.
    target_main: f64,
    /// Whether this item is frozen during the § 9.7 loop.
    frozen: bool,

    hypothetical_cross: f64,
    target_cross: f64,
    /// Distance from the margin-box cross-start edge to the first baseline.
    baseline: f64,

    offset_main: f64,
    offset_cross: f64,
}

impl FlexItem {
    fn outer_hypothetical_main(&self, is_row: bool) -> f64 {
        self.hypothetical_main + self.margin.main_sum(is_row)
    }

    fn outer_target_main(&self, is_row: bool) -> f64 {
        self.target_main + self.margin.main_sum(is_row)
    }

    fn max_main(&self, is_row: bool) -> Option<f64> {
        self.max_size.main(is_row)
    }

    fn has_cross_auto_margin(&self, is_row: bool) -> bool {
        self.margin_auto.cross_start(is_row) || self.margin_auto.cross_end(is_row)
    }

    /// [§ 8.3 'align-self'](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
    ///
    /// "If the cross size property of the flex item computes to auto, and
    /// neither of the cross-axis margins are auto, the flex item is
    /// stretched."
    fn is_stretched(&self, is_row: bool) -> bool {
        self.align_self == AlignItems::Stretch
            && self.size.cross(is_row).is_none()
            && !self.has_cross_auto_margin(is_row)
    }

    fn participates_in_baseline(&self, is_row: bool) -> bool {
        is_row && self.align_self == AlignItems::Baseline && !self.has_cross_auto_margin(is_row)
    }
}

/// [§ 9.3 Main Size Determination](https://www.w3.org/TR/css-flexbox-1/#main-sizing)
///
/// A flex line: a contiguous range of items plus its cross geometry.
#[derive(Debug, Clone, Copy, Default)]
struct FlexLine {
    start: usize,
    end: usize,
    cross_size: f64,
    /// Largest baseline distance among baseline-aligned items.
    max_baseline: f64,
    offset: f64,
}

/// Main entry point for flex layout.
///
/// [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
pub(crate) fn compute_flexbox(
    tree: &mut LayoutTree,
    node: NodeId,
    style: &Style,
    input: &LayoutInput,
) -> LayoutOutput {
    let is_row = style.flex_direction.is_row();
    let is_reverse = style.flex_direction.is_reverse();
    let is_wrap_reverse = style.flex_wrap == FlexWrap::WrapReverse;
    let single_line = style.flex_wrap == FlexWrap::NoWrap;

    let resolved = ResolvedBox::resolve(style, input.parent_size);
    let pb = resolved.padding_border();
    let pb_edges = resolved.edges.padding_border();
    let margin = resolved.edges.margin;

    // STEP 1 (§ 9.2 step 2): Determine the available main and cross space.
    //
    // "For each dimension, if that dimension of the flex container's content
    // box is a definite size, use that; if that dimension of the flex
    // container is being sized under a min or max-content constraint, the
    // available space in that dimension is that constraint; otherwise,
    // subtract the flex container's margin, border, and padding from the
    // space available to the flex container in that dimension."
    let mut known = input.known_dimensions.or(resolved.size);
    if known.width.is_none()
        && let Some(avail) = input.available_space.width.definite()
    {
        known.width = Some(resolved.clamp_width(avail - margin.horizontal()));
    }
    let inner = Size::new(
        known.width.map(|w| (w - pb.width).max(0.0)),
        known.height.map(|h| (h - pb.height).max(0.0)),
    );
    let available_inner = Size::new(
        inner.width.map_or_else(
            || input.available_space.width.shrink_by(margin.horizontal() + pb.width),
            AvailableSpace::Definite,
        ),
        inner.height.map_or_else(
            || input.available_space.height.shrink_by(margin.vertical() + pb.height),
            AvailableSpace::Definite,
        ),
    );

    // [§ 8.1 Gaps between flex items](https://www.w3.org/TR/css-align-3/#gaps)
    //
    // column-gap separates columns (the inline axis), row-gap separates rows.
    let gap = Size::new(
        style.gap.width.resolve_or_zero(inner.width).max(0.0),
        style.gap.height.resolve_or_zero(inner.height).max(0.0),
    );
    let main_gap = gap.main(is_row);
    let cross_gap = gap.cross(is_row);

    // STEP 2 (§ 9.1, § 5.4): Generate flex items in order-modified document
    // order.
    //
    // "A flex container lays out its content in order-modified document
    // order, starting from the lowest numbered ordinal group and going up.
    // Items with the same ordinal group are laid out in the order they
    // appear in the source document."
    let children = tree.children_snapshot(node);
    let mut items: Vec<FlexItem> = children
        .iter()
        .copied()
        .filter(|&c| compute::is_in_flow(tree, c))
        .map(|child| collect_item(tree, child, style, inner, is_row))
        .collect();
    items.sort_by_key(|item| item.order);

    // STEP 3 (§ 9.2 step 3): Determine the flex base size and hypothetical
    // main size of each item.
    for item in &mut items {
        determine_flex_base_size(tree, item, inner, available_inner, is_row);
    }

    // STEP 4 (§ 9.3 step 5): Collect flex items into flex lines.
    let line_limit = match available_inner.main(is_row) {
        AvailableSpace::Definite(v) => v,
        AvailableSpace::MinContent => 0.0,
        AvailableSpace::MaxContent => f64::INFINITY,
    };
    let under_min_content = available_inner.main(is_row) == AvailableSpace::MinContent
        && inner.main(is_row).is_none();
    let mut lines = collect_flex_lines(&items, single_line, line_limit, main_gap, is_row);

    // STEP 5 (§ 9.2 step 4): Determine the main size of the flex container.
    let inner_main = inner.main(is_row).unwrap_or_else(|| {
        let longest = lines
            .iter()
            .map(|line| {
                let slice = &items[line.start..line.end];
                let sum: f64 = slice
                    .iter()
                    .map(|item| intrinsic_contribution(item, under_min_content, is_row))
                    .sum();
                sum + main_gap * slice.len().saturating_sub(1) as f64
            })
            .fold(0.0, f64::max);
        if is_row {
            resolved.clamp_width(longest + pb.width) - pb.width
        } else {
            resolved.clamp_height(longest + pb.height) - pb.height
        }
    });

    // STEP 6 (§ 9.7): Resolve flexible lengths on each line.
    for line in &lines {
        resolve_flexible_lengths(&mut items[line.start..line.end], inner_main, main_gap, is_row);
    }

    // STEP 7 (§ 9.4 step 7): Determine the hypothetical cross size of each
    // item by performing layout with the used main size.
    for item in &mut items {
        determine_hypothetical_cross_size(tree, item, inner, available_inner, is_row);
    }

    // STEP 8 (§ 9.4 step 8): Calculate the cross size of each flex line.
    //
    // "If the flex container is single-line and has a definite cross size,
    // the cross size of the flex line is the flex container's inner cross
    // size."
    let definite_inner_cross = inner.cross(is_row);
    for line in &mut lines {
        let slice = &items[line.start..line.end];
        let mut max_outer: f64 = 0.0;
        let mut max_ascent: f64 = 0.0;
        let mut max_descent: f64 = 0.0;
        for item in slice {
            let outer = item.hypothetical_cross + item.margin.cross_sum(is_row);
            if item.participates_in_baseline(is_row) {
                max_ascent = max_ascent.max(item.baseline);
                max_descent = max_descent.max(outer - item.baseline);
            } else {
                max_outer = max_outer.max(outer);
            }
        }
        line.max_baseline = max_ascent;
        line.cross_size = match (single_line, definite_inner_cross) {
            (true, Some(cross)) => cross,
            (true, None) => {
                // "If the flex container is single-line, then clamp the
                // line's cross-size to be within the container's computed
                // min and max cross sizes."
                let natural = max_outer.max(max_ascent + max_descent);
                if is_row {
                    resolved.clamp_height(natural + pb.height) - pb.height
                } else {
                    resolved.clamp_width(natural + pb.width) - pb.width
                }
            }
            (false, _) => max_outer.max(max_ascent + max_descent),
        };
    }

    // STEP 9 (§ 9.4 step 15): Determine the flex container's used cross size.
    let lines_cross: f64 = lines.iter().map(|l| l.cross_size).sum::<f64>()
        + cross_gap * lines.len().saturating_sub(1) as f64;
    let inner_cross = definite_inner_cross.unwrap_or_else(|| {
        if is_row {
            resolved.clamp_height(lines_cross + pb.height) - pb.height
        } else {
            resolved.clamp_width(lines_cross + pb.width) - pb.width
        }
    });

    // STEP 10 (§ 9.4 step 9): Handle 'align-content: stretch'.
    //
    // "If the flex container has a definite cross size, align-content is
    // stretch, and the sum of the flex lines' cross sizes is less than the
    // flex container's inner cross size, increase the cross size of each
    // flex line by equal amounts such that the sum of their cross sizes
    // exactly equals the flex container's inner cross size."
    let free_cross = inner_cross - lines_cross;
    if !single_line
        && matches!(
            style.align_content,
            JustifyContent::Stretch | JustifyContent::Normal
        )
        && free_cross > 0.0
        && !lines.is_empty()
    {
        let extra = free_cross / lines.len() as f64;
        for line in &mut lines {
            line.cross_size += extra;
        }
    }

    // STEP 11 (§ 9.4 step 11): Determine the used cross size of each item.
    //
    // "If a flex item has align-self: stretch, its computed cross size
    // property is auto, and neither of its cross-axis margins are auto, the
    // used outer cross size is the used cross size of its flex line,
    // clamped according to the item's used min and max cross sizes."
    for line in &lines {
        for item in &mut items[line.start..line.end] {
            item.target_cross = if item.is_stretched(is_row) {
                let stretched = line.cross_size - item.margin.cross_sum(is_row);
                clamp_size(
                    stretched,
                    item.min_size.cross(is_row),
                    item.max_size.cross(is_row),
                )
                .max(item.padding_border.cross(is_row))
            } else {
                item.hypothetical_cross
            };
        }
    }

    // STEP 12 (§ 9.5): Main-axis alignment.
    for line in &lines {
        distribute_main_axis(
            &mut items[line.start..line.end],
            style.justify_content,
            inner_main,
            main_gap,
            is_row,
        );
        if is_reverse {
            for item in &mut items[line.start..line.end] {
                item.offset_main = inner_main - item.offset_main - item.target_main;
            }
        }
    }

    // STEP 13 (§ 9.6): Cross-axis alignment.
    //
    // [§ 8.4 'align-content'](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
    //
    // "Note, this property has no effect on a single-line flex container."
    let used_lines_cross: f64 = lines.iter().map(|l| l.cross_size).sum::<f64>()
        + cross_gap * lines.len().saturating_sub(1) as f64;
    let (mut cursor, between) = if single_line {
        (0.0, 0.0)
    } else {
        compute_justify_offsets(
            style.align_content,
            inner_cross - used_lines_cross,
            lines.len(),
        )
    };
    for line in &mut lines {
        line.offset = cursor;
        cursor += line.cross_size + cross_gap + between;
        // "wrap-reverse: Same as wrap, except the cross-start and cross-end
        // directions are swapped."
        if is_wrap_reverse {
            line.offset = inner_cross - line.offset - line.cross_size;
        }
    }
    for line in &lines {
        for item in &mut items[line.start..line.end] {
            item.offset_cross = line.offset + align_in_line(item, line, is_row, is_wrap_reverse);
        }
    }

    let size = Size::from_main_cross(
        is_row,
        inner_main + pb.main(is_row),
        inner_cross + pb.cross(is_row),
    );

    // STEP 14: Lay out each item with its final size and position it.
    let mut first_baseline = None;
    if input.is_perform() {
        let content = Size::from_main_cross(is_row, inner_main, inner_cross);
        for item in &items {
            let out = compute::compute_node(
                tree,
                item.node,
                LayoutInput::perform(
                    Size::from_main_cross(is_row, Some(item.target_main), Some(item.target_cross)),
                    inner,
                    Size::from_main_cross(
                        is_row,
                        AvailableSpace::Definite(item.target_main),
                        AvailableSpace::Definite(item.target_cross),
                    ),
                ),
            );
            let (x, y) = if is_row {
                (item.offset_main, item.offset_cross)
            } else {
                (item.offset_cross, item.offset_main)
            };
            if is_row
                && first_baseline.is_none()
                && let Some(baseline) = out.first_baseline
            {
                first_baseline = Some(pb_edges.top + y + baseline);
            }
            compute::place_child(tree, item.node, x, y, content);
        }
        compute::layout_out_of_flow_children(tree, &children, size, &resolved.edges);
    } else if is_row && let Some(line) = lines.first() {
        first_baseline = items[line.start..line.end]
            .first()
            .map(|item| pb_edges.top + item.offset_cross - item.margin.top + item.baseline);
    }

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[FLEX] {node} size={}x{} items={} lines={}",
        size.width,
        size.height,
        items.len(),
        lines.len()
    );

    LayoutOutput {
        size,
        content_size: Size::from_main_cross(
            is_row,
            lines
                .iter()
                .map(|l| {
                    items[l.start..l.end]
                        .iter()
                        .map(|i| i.outer_target_main(is_row))
                        .sum::<f64>()
                })
                .fold(0.0, f64::max),
            used_lines_cross,
        ),
        first_baseline,
    }
}

/// Build the per-item record from the child's style.
fn collect_item(
    tree: &LayoutTree,
    child: NodeId,
    container: &Style,
    inner: Size<Option<f64>>,
    is_row: bool,
) -> FlexItem {
    let style = tree.style_snapshot(child);
    let resolved = ResolvedBox::resolve(&style, inner);
    let pb = resolved.padding_border();

    // [§ 7.2.3 'flex-basis'](https://www.w3.org/TR/css-flexbox-1/#flex-basis-property)
    //
    // "For all values other than auto and content, flex-basis is resolved
    // the same way as width in horizontal writing modes."
    let explicit_basis = style
        .flex_basis
        .resolve(inner.main(is_row))
        .map(|b| to_border_box(b, style.box_sizing, pb.main(is_row)));

    let min_main_dimension = if is_row {
        style.min_size.width
    } else {
        style.min_size.height
    };

    FlexItem {
        node: child,
        order: style.order,
        align_self: style.align_self.unwrap_or(container.align_items),
        margin: resolved.edges.margin,
        margin_auto: resolved.edges.margin_auto,
        padding_border: pb,
        size: resolved.size,
        min_size: resolved.min_size,
        max_size: resolved.max_size,
        explicit_basis,
        auto_min_main: min_main_dimension == Dimension::Auto
            && style.overflow == Overflow::Visible,
        grow: style.flex_grow.max(0.0),
        shrink: style.flex_shrink.max(0.0),
        base_size: 0.0,
        min_main: 0.0,
        hypothetical_main: 0.0,
        target_main: 0.0,
        frozen: false,
        hypothetical_cross: 0.0,
        target_cross: 0.0,
        baseline: 0.0,
        offset_main: 0.0,
        offset_cross: 0.0,
    }
}

/// Measure an item's main size under a main-axis constraint.
fn measure_main(
    tree: &mut LayoutTree,
    item: &FlexItem,
    inner: Size<Option<f64>>,
    available_inner: Size<AvailableSpace>,
    main_constraint: AvailableSpace,
    is_row: bool,
) -> f64 {
    let cross_available = available_inner
        .cross(is_row)
        .shrink_by(item.margin.cross_sum(is_row));
    compute::compute_node(
        tree,
        item.node,
        LayoutInput::measure(
            Size::from_main_cross(is_row, None, item.size.cross(is_row)),
            inner,
            Size::from_main_cross(is_row, main_constraint, cross_available),
        ),
    )
    .size
    .main(is_row)
}

/// Determine flex base size from flex-basis, the main size property or
/// content measurement.
///
/// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
///
/// "A. If the item has a definite used flex basis, that's the flex base
/// size."
/// "E. Otherwise, size the item into the available space using its used
/// flex basis in place of its main size, treating a value of content as
/// max-content."
///
/// "The hypothetical main size is the item's flex base size clamped
/// according to its used min and max main sizes (and flooring the content
/// box size at zero)."
fn determine_flex_base_size(
    tree: &mut LayoutTree,
    item: &mut FlexItem,
    inner: Size<Option<f64>>,
    available_inner: Size<AvailableSpace>,
    is_row: bool,
) {
    let base = match item.explicit_basis.or(item.size.main(is_row)) {
        Some(base) => base,
        None => measure_main(
            tree,
            item,
            inner,
            available_inner,
            AvailableSpace::MaxContent,
            is_row,
        ),
    };

    // [§ 4.5 Automatic Minimum Size of Flex Items](https://www.w3.org/TR/css-flexbox-1/#min-size-auto)
    //
    // "To provide a more reasonable default minimum size for flex items, the
    // used value of a main axis automatic minimum size on a flex item that
    // is not a scroll container is a content-based minimum size."
    //
    // "The content-based minimum size of a flex item is the smaller of its
    // specified size suggestion and its content size suggestion if its
    // specified size suggestion exists, otherwise its content size
    // suggestion."
    let min_main = match item.min_size.main(is_row) {
        Some(min) => min,
        None if item.auto_min_main => {
            let content = measure_main(
                tree,
                item,
                inner,
                available_inner,
                AvailableSpace::MinContent,
                is_row,
            );
            let suggestion = item.size.main(is_row).map_or(content, |s| content.min(s));
            item.max_main(is_row).map_or(suggestion, |max| suggestion.min(max))
        }
        None => 0.0,
    };
    let pb_main = item.padding_border.main(is_row);

    item.base_size = base;
    item.min_main = min_main.max(pb_main);
    item.hypothetical_main =
        clamp_size(base, Some(item.min_main), item.max_main(is_row)).max(pb_main);
    item.target_main = item.hypothetical_main;
}

/// An item's contribution to its container's intrinsic main size.
///
/// Under a min-content constraint an item whose main size comes from its
/// content contributes its minimum instead of its max-content size.
fn intrinsic_contribution(item: &FlexItem, under_min_content: bool, is_row: bool) -> f64 {
    let inner = if under_min_content
        && item.explicit_basis.is_none()
        && item.size.main(is_row).is_none()
    {
        item.min_main
    } else {
        item.hypothetical_main
    };
    inner + item.margin.main_sum(is_row)
}

/// [§ 9.3 step 5](https://www.w3.org/TR/css-flexbox-1/#algo-line-break)
///
/// "If the flex container is single-line, collect all the flex items into
/// a single flex line."
///
/// "Otherwise, starting from the first uncollected item, collect
/// consecutive items one by one until the first time that the next
/// collected item would not fit into the flex container's inner main size
/// ... If the very first uncollected item wouldn't fit, collect just it
/// into the line."
fn collect_flex_lines(
    items: &[FlexItem],
    single_line: bool,
    limit: f64,
    gap: f64,
    is_row: bool,
) -> Vec<FlexLine> {
    if items.is_empty() {
        return Vec::new();
    }
    if single_line {
        return vec![FlexLine {
            start: 0,
            end: items.len(),
            ..FlexLine::default()
        }];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (i, item) in items.iter().enumerate() {
        let outer = item.outer_hypothetical_main(is_row);
        if i > start && used + gap + outer > limit + EPSILON {
            lines.push(FlexLine {
                start,
                end: i,
                ..FlexLine::default()
            });
            start = i;
            used = outer;
        } else if i == start {
            used = outer;
        } else {
            used += gap + outer;
        }
    }
    lines.push(FlexLine {
        start,
        end: items.len(),
        ..FlexLine::default()
    });
    lines
}

/// [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
///
/// Full iterative freeze-loop algorithm. Every round either freezes all
/// remaining items or at least one violating item, so the loop runs at most
/// `items.len()` rounds.
fn resolve_flexible_lengths(items: &mut [FlexItem], inner_main: f64, gap: f64, is_row: bool) {
    if items.is_empty() {
        return;
    }
    // A zero-sized container has no space to distribute.
    if inner_main <= 0.0 {
        for item in items.iter_mut() {
            item.target_main = item.hypothetical_main;
            item.frozen = true;
        }
        return;
    }
    let gaps = gap * (items.len() - 1) as f64;

    // STEP 1: "Determine the used flex factor."
    //
    // "If the sum of the outer hypothetical main sizes of all items on the
    // line is less than the flex container's inner main size, use the flex
    // grow factor for the rest of this algorithm; otherwise, use the flex
    // shrink factor."
    let sum_outer_hypo: f64 = items
        .iter()
        .map(|item| item.outer_hypothetical_main(is_row))
        .sum::<f64>()
        + gaps;
    let growing = sum_outer_hypo < inner_main;

    // STEP 2: "Size inflexible items."
    //
    // "Freeze, setting its target main size to its hypothetical main size…
    //   - any item that has a flex factor of zero
    //   - if using the flex grow factor: any item that has a flex base size
    //     greater than its hypothetical main size
    //   - if using the flex shrink factor: any item that has a flex base size
    //     less than its hypothetical main size"
    for item in items.iter_mut() {
        let factor = if growing { item.grow } else { item.shrink };
        item.frozen = factor == 0.0
            || (growing && item.base_size > item.hypothetical_main)
            || (!growing && item.base_size < item.hypothetical_main);
        item.target_main = item.hypothetical_main;
    }

    let outer_used = |items: &[FlexItem]| -> f64 {
        items
            .iter()
            .map(|item| {
                let main = if item.frozen {
                    item.target_main
                } else {
                    item.base_size
                };
                main + item.margin.main_sum(is_row)
            })
            .sum::<f64>()
            + gaps
    };

    // STEP 3: "Calculate initial free space."
    let initial_free_space = inner_main - outer_used(items);

    // STEP 4: Loop until all items are frozen.
    for _round in 0..=items.len() {
        // 4a. "Check for flexible items. If all the flex items on the line
        //      are frozen, free space has been distributed; exit this loop."
        if items.iter().all(|item| item.frozen) {
            break;
        }

        // 4b. "Calculate the remaining free space as for initial free space,
        //      above. If the sum of the unfrozen flex items' flex factors is
        //      less than one, multiply the initial free space by this sum. If
        //      the magnitude of this value is less than the magnitude of the
        //      remaining free space, use this as the remaining free space."
        let remaining_free = inner_main - outer_used(items);
        let unfrozen_factor_sum: f64 = items
            .iter()
            .filter(|item| !item.frozen)
            .map(|item| if growing { item.grow } else { item.shrink })
            .sum();
        let free_space = if unfrozen_factor_sum < 1.0 {
            let scaled = initial_free_space * unfrozen_factor_sum;
            if scaled.abs() < remaining_free.abs() {
                scaled
            } else {
                remaining_free
            }
        } else {
            remaining_free
        };

        // 4c. Distribute free space proportional to the flex factors.
        if growing {
            // "Find the ratio of the item's flex grow factor to the sum of
            // the flex grow factors of all unfrozen items on the line. Set
            // the item's target main size to its flex base size plus a
            // fraction of the remaining free space proportional to the
            // ratio."
            if unfrozen_factor_sum > 0.0 {
                for item in items.iter_mut().filter(|item| !item.frozen) {
                    let ratio = item.grow / unfrozen_factor_sum;
                    item.target_main = free_space.mul_add(ratio, item.base_size);
                }
            }
        } else {
            // "For every unfrozen item on the line, multiply its flex shrink
            // factor by its inner flex base size, and note this as its
            // scaled flex shrink factor... Set the item's target main size
            // to its flex base size minus a fraction of the absolute value
            // of the remaining free space proportional to the ratio."
            let inner_base = |item: &FlexItem| {
                (item.base_size - item.padding_border.main(is_row)).max(0.0)
            };
            let scaled_shrink_sum: f64 = items
                .iter()
                .filter(|item| !item.frozen)
                .map(|item| item.shrink * inner_base(item))
                .sum();
            for item in items.iter_mut().filter(|item| !item.frozen) {
                item.target_main = if scaled_shrink_sum > 0.0 {
                    let ratio = item.shrink * inner_base(item) / scaled_shrink_sum;
                    free_space.abs().mul_add(-ratio, item.base_size)
                } else {
                    item.base_size
                };
            }
        }

        // 4d. "Fix min/max violations. Clamp each non-frozen item's target
        //      main size by its used min and max main sizes and floor its
        //      content-box size at zero. If the item's target main size was
        //      made smaller by this, it's a max violation. If the item's
        //      target main size was made larger by this, it's a min
        //      violation."
        let mut total_violation = 0.0;
        let mut violations = Vec::with_capacity(items.len());
        for item in items.iter_mut() {
            if item.frozen {
                violations.push(0.0);
                continue;
            }
            let clamped = clamp_size(item.target_main, Some(item.min_main), item.max_main(is_row))
                .max(item.padding_border.main(is_row));
            let violation = clamped - item.target_main;
            total_violation += violation;
            violations.push(violation);
            item.target_main = clamped;
        }

        // 4e. "Freeze over-flexed items. The total violation is the sum of
        //      the adjustments from the previous step.
        //        - Zero: Freeze all items.
        //        - Positive: Freeze all the items with min violations.
        //        - Negative: Freeze all the items with max violations."
        for (item, violation) in items.iter_mut().zip(violations) {
            if item.frozen {
                continue;
            }
            if total_violation.abs() < EPSILON
                || (total_violation > 0.0 && violation > 0.0)
                || (total_violation < 0.0 && violation < 0.0)
            {
                item.frozen = true;
            }
        }
    }

    // The loop bound above is never reached in practice; anything still
    // unfrozen keeps its clamped target.
    for item in items.iter_mut() {
        item.frozen = true;
    }
}

/// [§ 9.4 step 7](https://www.w3.org/TR/css-flexbox-1/#algo-cross-item)
///
/// "Determine the hypothetical cross size of each item by performing layout
/// with the used main size and the available space, treating auto as
/// fit-content."
fn determine_hypothetical_cross_size(
    tree: &mut LayoutTree,
    item: &mut FlexItem,
    inner: Size<Option<f64>>,
    available_inner: Size<AvailableSpace>,
    is_row: bool,
) {
    let specified = item.size.cross(is_row);
    let needs_measure = specified.is_none() || item.participates_in_baseline(is_row);
    let pb_cross = item.padding_border.cross(is_row);

    let cross = if needs_measure {
        let cross_available = available_inner
            .cross(is_row)
            .shrink_by(item.margin.cross_sum(is_row));
        // A fit-content width is min(max-content, available); measure the
        // max-content size and cap it below. Heights come from layout at
        // the used width directly.
        let constraint = if is_row {
            cross_available
        } else {
            AvailableSpace::MaxContent
        };
        let out = compute::compute_node(
            tree,
            item.node,
            LayoutInput::measure(
                Size::from_main_cross(is_row, Some(item.target_main), specified),
                inner,
                Size::from_main_cross(is_row, AvailableSpace::Definite(item.target_main), constraint),
            ),
        );
        let measured = out.size.cross(is_row);
        if is_row {
            item.baseline =
                item.margin.top + out.first_baseline.unwrap_or(out.size.height);
        }
        match (specified, cross_available) {
            (Some(s), _) => s,
            (None, AvailableSpace::Definite(avail)) if !is_row => measured.min(avail),
            (None, _) => measured,
        }
    } else {
        specified.unwrap_or(0.0)
    };

    item.hypothetical_cross = clamp_size(
        cross,
        item.min_size.cross(is_row),
        item.max_size.cross(is_row),
    )
    .max(pb_cross);
    if is_row && !needs_measure {
        item.baseline = item.margin.top + item.hypothetical_cross;
    }
}

/// Position the items of one line along the main axis.
///
/// [§ 9.5 step 12](https://www.w3.org/TR/css-flexbox-1/#algo-main-align)
///
/// "If the remaining free space is positive and at least one main-axis
/// margin on this line is auto, distribute the free space equally among
/// these margins. Otherwise, set all auto margins to zero."
///
/// "Align the items along the main-axis per justify-content."
fn distribute_main_axis(
    items: &mut [FlexItem],
    justify: JustifyContent,
    inner_main: f64,
    gap: f64,
    is_row: bool,
) {
    let used: f64 = items
        .iter()
        .map(|item| item.outer_target_main(is_row))
        .sum::<f64>()
        + gap * items.len().saturating_sub(1) as f64;
    let free = inner_main - used;
    let auto_margins = items
        .iter()
        .map(|item| {
            usize::from(item.margin_auto.main_start(is_row))
                + usize::from(item.margin_auto.main_end(is_row))
        })
        .sum::<usize>();

    let (start, between, per_auto) = if free > 0.0 && auto_margins > 0 {
        (0.0, 0.0, free / auto_margins as f64)
    } else {
        let (start, between) = compute_justify_offsets(justify, free, items.len());
        (start, between, 0.0)
    };

    let mut cursor = start;
    for item in items.iter_mut() {
        if item.margin_auto.main_start(is_row) {
            cursor += per_auto;
        }
        cursor += item.margin.main_start(is_row);
        item.offset_main = cursor;
        cursor += item.target_main + item.margin.main_end(is_row) + gap + between;
        if item.margin_auto.main_end(is_row) {
            cursor += per_auto;
        }
    }
}

/// Offset of an item's border box from its line's cross-start edge.
///
/// [§ 9.6 step 13-14](https://www.w3.org/TR/css-flexbox-1/#algo-cross-align)
///
/// "If a flex item has auto cross-axis margins: If its outer cross size is
/// less than the cross size of its flex line, distribute the difference in
/// those sizes equally to the auto margins."
fn align_in_line(item: &FlexItem, line: &FlexLine, is_row: bool, wrap_reverse: bool) -> f64 {
    let margin_start = item.margin.cross_start(is_row);
    let outer = item.target_cross + item.margin.cross_sum(is_row);
    let free = line.cross_size - outer;

    let auto_start = item.margin_auto.cross_start(is_row);
    let auto_end = item.margin_auto.cross_end(is_row);
    if auto_start || auto_end {
        let free = free.max(0.0);
        return margin_start
            + match (auto_start, auto_end) {
                (true, true) => free / 2.0,
                (true, false) => free,
                _ => 0.0,
            };
    }

    let align = match (item.align_self, wrap_reverse) {
        (AlignItems::FlexStart, true) => AlignItems::FlexEnd,
        (AlignItems::FlexEnd, true) => AlignItems::FlexStart,
        (align, _) => align,
    };
    match align {
        AlignItems::FlexStart | AlignItems::Stretch => margin_start,
        AlignItems::FlexEnd => free + margin_start,
        AlignItems::Center => free / 2.0 + margin_start,
        AlignItems::Baseline if item.participates_in_baseline(is_row) => {
            line.max_baseline - item.baseline + margin_start
        }
        AlignItems::Baseline => margin_start,
    }
}

/// Compute content-distribution offsets for `justify-content` or
/// `align-content`.
///
/// [§ 8.2 Axis Alignment: the justify-content property](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// Returns `(initial_offset, gap_between_items)`. `normal` and `stretch`
/// pack toward the start here; stretching is handled by the caller.
pub(crate) fn compute_justify_offsets(
    keyword: JustifyContent,
    free_space: f64,
    item_count: usize,
) -> (f64, f64) {
    if item_count == 0 {
        return (0.0, 0.0);
    }

    match keyword {
        // "Flex items are packed toward the end of the line."
        JustifyContent::FlexEnd => (free_space, 0.0),

        // "Flex items are packed toward the center of the line."
        JustifyContent::Center => (free_space / 2.0, 0.0),

        // "Flex items are evenly distributed in the line. If the leftover
        // free-space is negative or there is only a single flex item on the
        // line, this value is identical to flex-start."
        JustifyContent::SpaceBetween => {
            if item_count <= 1 || free_space <= 0.0 {
                (0.0, 0.0)
            } else {
                (0.0, free_space / (item_count - 1) as f64)
            }
        }

        // "Flex items are evenly distributed in the line, with half-size
        // spaces on either end. If the leftover free-space is negative or
        // there is only a single flex item on the line, this value is
        // identical to center."
        JustifyContent::SpaceAround => {
            if free_space <= 0.0 {
                (free_space / 2.0, 0.0)
            } else {
                let gap = free_space / item_count as f64;
                (gap / 2.0, gap)
            }
        }

        // "The alignment subjects are evenly distributed in the alignment
        // container, with a full-size space on either end."
        JustifyContent::SpaceEvenly => {
            if free_space <= 0.0 {
                (free_space / 2.0, 0.0)
            } else {
                let gap = free_space / (item_count + 1) as f64;
                (gap, gap)
            }
        }

        // "Flex items are packed toward the start of the line."
        JustifyContent::FlexStart | JustifyContent::Normal | JustifyContent::Stretch => {
            (0.0, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_between_single_item_is_flex_start() {
        assert_eq!(
            compute_justify_offsets(JustifyContent::SpaceBetween, 100.0, 1),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_space_evenly_splits_into_n_plus_one() {
        assert_eq!(
            compute_justify_offsets(JustifyContent::SpaceEvenly, 120.0, 3),
            (30.0, 30.0)
        );
    }

    #[test]
    fn test_space_around_negative_centers() {
        assert_eq!(
            compute_justify_offsets(JustifyContent::SpaceAround, -20.0, 2),
            (-10.0, 0.0)
        );
    }
}
