//! CSS Grid Layout Algorithm.
//!
//! [§ 12 Grid Sizing](https://www.w3.org/TR/css-grid-1/#layout-algorithm)
//!
//! Placement follows § 8.5 with an occupancy grid that grows along the
//! auto-flow axis. Track sizing follows § 12.3–12.8: intrinsic
//! contributions, maximizing, flexible-length expansion and stretching of
//! `auto` tracks. Columns are sized first, rows second with the column
//! widths known. Lines before the start of the explicit grid are clamped to
//! its first line.

use std::ops::Range;

use crate::box_model::{ResolvedBox, clamp_size};
use crate::compute::{self, LayoutInput, LayoutOutput};
use crate::flex::compute_justify_offsets;
use crate::geometry::{EPSILON, Edges, Size};
use crate::style::{
    AlignItems, AvailableSpace, GridAutoFlow, GridLine, GridPlacement, JustifyContent,
    MAX_GRID_LINE, Style, TrackSizing,
};
use crate::tree::{LayoutTree, NodeId};

/// 0-based, end-exclusive track ranges of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct GridArea {
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
}

/// One axis of an item's placement before auto-placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisPlacement {
    /// The start track, when the item names a definite line.
    start: Option<usize>,
    span: usize,
}

/// A grid item with its resolved box and position.
#[derive(Debug, Clone)]
struct GridItem {
    node: NodeId,
    area: GridArea,
    margin: Edges<f64>,
    margin_auto: Edges<bool>,
    padding_border: Size<f64>,
    size: Size<Option<f64>>,
    min_size: Size<Option<f64>>,
    max_size: Size<Option<f64>>,
    justify_self: AlignItems,
    align_self: AlignItems,
    /// Border-box widths under min-content and max-content constraints.
    min_content_width: f64,
    max_content_width: f64,
    width: f64,
    /// Height laid out at [`GridItem::width`], before any stretching.
    content_height: f64,
}

/// A track during the sizing algorithm.
#[derive(Debug, Clone, Copy)]
struct Track {
    sizing: TrackSizing,
    base: f64,
    /// The growth limit; infinite until an item or the sizing function
    /// bounds it.
    limit: f64,
    /// Set when the growth limit went from infinite to finite while
    /// accommodating a spanning item.
    infinitely_growable: bool,
}

impl Track {
    fn raise_limit(&mut self, value: f64) {
        self.limit = if self.limit.is_infinite() {
            value
        } else {
            self.limit.max(value)
        };
    }
}

/// An item's outer size contribution to one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contribution {
    start: usize,
    span: usize,
    min_content: f64,
    max_content: f64,
}

/// Main entry point for grid layout.
///
/// [§ 12 Grid Sizing](https://www.w3.org/TR/css-grid-1/#layout-algorithm)
pub(crate) fn compute_grid(
    tree: &mut LayoutTree,
    node: NodeId,
    style: &Style,
    input: &LayoutInput,
) -> LayoutOutput {
    let resolved = ResolvedBox::resolve(style, input.parent_size);
    let pb = resolved.padding_border();
    let pb_edges = resolved.edges.padding_border();
    let margin = resolved.edges.margin;

    // STEP 1 (§ 12.1): Resolve the container's own definite sizes.
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
    let gap = Size::new(
        style.gap.width.resolve_or_zero(inner.width).max(0.0),
        style.gap.height.resolve_or_zero(inner.height).max(0.0),
    );

    // STEP 2 (§ 8.5): Place grid items.
    let children = tree.children_snapshot(node);
    let in_flow: Vec<NodeId> = children
        .iter()
        .copied()
        .filter(|&c| compute::is_in_flow(tree, c))
        .collect();
    let item_styles: Vec<Style> = in_flow.iter().map(|&c| tree.style_snapshot(c)).collect();
    let explicit = Size::new(
        style.grid_template_columns.len(),
        style.grid_template_rows.len(),
    );
    let placements: Vec<(AxisPlacement, AxisPlacement)> = item_styles
        .iter()
        .map(|s| {
            (
                resolve_axis(s.grid_row, explicit.height),
                resolve_axis(s.grid_column, explicit.width),
            )
        })
        .collect();
    let areas = place_items(&placements, explicit, style.grid_auto_flow);

    // STEP 3 (§ 7.6): The implicit grid.
    //
    // "The grid-auto-columns and grid-auto-rows properties specify the size
    // of tracks not assigned a size by grid-template-rows or
    // grid-template-columns."
    let column_count = areas.iter().map(|a| a.col_end).fold(explicit.width, usize::max);
    let row_count = areas.iter().map(|a| a.row_end).fold(explicit.height, usize::max);
    let column_sizing: Vec<TrackSizing> = (0..column_count)
        .map(|i| {
            style
                .grid_template_columns
                .get(i)
                .copied()
                .unwrap_or(style.grid_auto_columns)
        })
        .collect();
    let row_sizing: Vec<TrackSizing> = (0..row_count)
        .map(|i| {
            style
                .grid_template_rows
                .get(i)
                .copied()
                .unwrap_or(style.grid_auto_rows)
        })
        .collect();

    let mut items: Vec<GridItem> = in_flow
        .iter()
        .zip(&item_styles)
        .zip(&areas)
        .map(|((&child, child_style), &area)| collect_item(child, child_style, area, style, inner))
        .collect();

    // STEP 4 (§ 12.3): Size the columns.
    let available_columns = inner
        .width
        .map_or(input.available_space.width, AvailableSpace::Definite);
    let column_contributions: Vec<Contribution> = items
        .iter_mut()
        .map(|item| column_contribution(tree, item, inner))
        .collect();
    let columns = size_tracks(
        &column_sizing,
        &column_contributions,
        available_columns,
        gap.width,
        style.justify_content,
    );
    let inner_width = inner.width.unwrap_or_else(|| {
        resolved.clamp_width(span_with_gaps(&columns, gap.width) + pb.width) - pb.width
    });
    let column_offsets = track_offsets(&columns, gap.width, inner_width, style.justify_content);

    // STEP 5 (§ 12.3): Size the rows with the column widths known.
    //
    // "Next, the track sizing algorithm resolves the sizes of the grid rows,
    // using the grid column sizes calculated in the previous step."
    let row_contributions: Vec<Contribution> = items
        .iter_mut()
        .map(|item| {
            let area_width = area_extent(
                &column_offsets,
                &columns,
                item.area.col_start..item.area.col_end,
            );
            row_contribution(tree, item, area_width, inner)
        })
        .collect();
    let available_rows = inner
        .height
        .map_or(AvailableSpace::MaxContent, AvailableSpace::Definite);
    let rows = size_tracks(
        &row_sizing,
        &row_contributions,
        available_rows,
        gap.height,
        style.align_content,
    );
    let inner_height = inner.height.unwrap_or_else(|| {
        resolved.clamp_height(span_with_gaps(&rows, gap.height) + pb.height) - pb.height
    });
    let row_offsets = track_offsets(&rows, gap.height, inner_height, style.align_content);

    let size = Size::new(inner_width + pb.width, inner_height + pb.height);

    // STEP 6 (§ 11 Alignment): Align each item in its area and lay it out.
    let mut first_baseline = None;
    if input.is_perform() {
        let content = Size::new(inner_width, inner_height);
        for item in &items {
            let area_x = column_offsets.get(item.area.col_start).copied().unwrap_or(0.0);
            let area_y = row_offsets.get(item.area.row_start).copied().unwrap_or(0.0);
            let area_width =
                area_extent(&column_offsets, &columns, item.area.col_start..item.area.col_end);
            let area_height =
                area_extent(&row_offsets, &rows, item.area.row_start..item.area.row_end);

            let height = item_height(item, area_height);
            let x = area_x
                + item.margin.left
                + align_offset(
                    item.justify_self,
                    area_width - item.width - item.margin.horizontal(),
                    item.margin_auto.left,
                    item.margin_auto.right,
                );
            let y = area_y
                + item.margin.top
                + align_offset(
                    item.align_self,
                    area_height - height - item.margin.vertical(),
                    item.margin_auto.top,
                    item.margin_auto.bottom,
                );

            let out = compute::compute_node(
                tree,
                item.node,
                LayoutInput::perform(
                    Size::new(Some(item.width), Some(height)),
                    content.map(Some),
                    Size::new(
                        AvailableSpace::Definite(area_width),
                        AvailableSpace::Definite(area_height),
                    ),
                ),
            );
            if item.area.row_start == 0
                && first_baseline.is_none()
                && let Some(baseline) = out.first_baseline
            {
                first_baseline = Some(pb_edges.top + y + baseline);
            }
            compute::place_child(tree, item.node, x, y, content);
        }
        compute::layout_out_of_flow_children(tree, &children, size, &resolved.edges);
    }

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[GRID] {node} size={}x{} columns={columns:?} rows={rows:?}",
        size.width, size.height
    );

    LayoutOutput {
        size,
        content_size: Size::new(
            span_with_gaps(&columns, gap.width),
            span_with_gaps(&rows, gap.height),
        ),
        first_baseline,
    }
}

fn collect_item(
    node: NodeId,
    style: &Style,
    area: GridArea,
    container: &Style,
    inner: Size<Option<f64>>,
) -> GridItem {
    let resolved = ResolvedBox::resolve(style, inner);
    GridItem {
        node,
        area,
        margin: resolved.edges.margin,
        margin_auto: resolved.edges.margin_auto,
        padding_border: resolved.padding_border(),
        size: resolved.size,
        min_size: resolved.min_size,
        max_size: resolved.max_size,
        justify_self: style.justify_self.unwrap_or(container.justify_items),
        align_self: style.align_self.unwrap_or(container.align_items),
        min_content_width: 0.0,
        max_content_width: 0.0,
        width: 0.0,
        content_height: 0.0,
    }
}

/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// Convert a 1-based line number into a 0-based line index. "If a negative
/// integer is given, it instead counts in reverse, starting from the end
/// edge of the explicit grid." Lines past [`MAX_GRID_LINE`] are clamped.
fn line_index(line: i32, explicit_tracks: usize) -> usize {
    match line.clamp(-MAX_GRID_LINE, MAX_GRID_LINE) {
        n if n > 0 => (n - 1) as usize,
        n if n < 0 => {
            let index = explicit_tracks as i64 + 1 + i64::from(n);
            index.max(0) as usize
        }
        _ => 0,
    }
}

fn span_of(line: GridLine) -> usize {
    match line {
        GridLine::Span(n) => n.clamp(1, MAX_GRID_LINE.unsigned_abs()) as usize,
        GridLine::Auto | GridLine::Line(_) => 1,
    }
}

/// [§ 8.3.1 Grid Placement Conflict Handling](https://www.w3.org/TR/css-grid-1/#grid-placement-errors)
///
/// "If the placement for a grid item contains two lines, and the start line
/// is further end-ward than the end line, swap the two lines. If the start
/// line is equal to the end line, remove the end line."
fn resolve_axis(placement: GridPlacement, explicit_tracks: usize) -> AxisPlacement {
    match (placement.start, placement.end) {
        (GridLine::Line(s), GridLine::Line(e)) => {
            let (a, b) = (
                line_index(s, explicit_tracks),
                line_index(e, explicit_tracks),
            );
            let (a, b) = if b < a { (b, a) } else { (a, b) };
            AxisPlacement {
                start: Some(a),
                span: (b - a).max(1),
            }
        }
        (GridLine::Line(s), end) => AxisPlacement {
            start: Some(line_index(s, explicit_tracks)),
            span: span_of(end),
        },
        (start, GridLine::Line(e)) => {
            let end = line_index(e, explicit_tracks);
            let start = end.saturating_sub(span_of(start));
            AxisPlacement {
                start: Some(start),
                span: (end - start).max(1),
            }
        }
        (start, end) => AxisPlacement {
            start: None,
            span: span_of(start).max(span_of(end)),
        },
    }
}

/// Cells taken by placed items, indexed `[major][minor]` where the major
/// axis is the one auto-placement grows along.
#[derive(Debug, Default)]
struct Occupancy {
    cells: Vec<Vec<bool>>,
    minor_len: usize,
}

impl Occupancy {
    fn is_free(&self, mut major: Range<usize>, minor: Range<usize>) -> bool {
        major.all(|m| {
            self.cells
                .get(m)
                .is_none_or(|row| minor.clone().all(|n| !row.get(n).copied().unwrap_or(false)))
        })
    }

    fn mark(&mut self, major: Range<usize>, minor: Range<usize>) {
        self.minor_len = self.minor_len.max(minor.end);
        if self.cells.len() < major.end {
            self.cells.resize_with(major.end, Vec::new);
        }
        for row in &mut self.cells[major] {
            if row.len() < minor.end {
                row.resize(minor.end, false);
            }
            for cell in &mut row[minor.clone()] {
                *cell = true;
            }
        }
    }
}

/// [§ 8.5 Grid Item Placement Algorithm](https://www.w3.org/TR/css-grid-1/#auto-placement-algo)
///
/// `placements` holds `(row, column)` per item. Returns one area per item.
fn place_items(
    placements: &[(AxisPlacement, AxisPlacement)],
    explicit: Size<usize>,
    flow: GridAutoFlow,
) -> Vec<GridArea> {
    let is_row = flow.is_row();
    let dense = flow.is_dense();
    let view = |p: &(AxisPlacement, AxisPlacement)| if is_row { (p.0, p.1) } else { (p.1, p.0) };

    // The minor axis never grows during auto-placement, so fix its length up
    // front from the explicit grid and every item that constrains it.
    let explicit_minor = if is_row { explicit.width } else { explicit.height };
    let mut occupancy = Occupancy {
        cells: Vec::new(),
        minor_len: placements
            .iter()
            .map(|p| {
                let (_, minor) = view(p);
                minor.start.unwrap_or(0) + minor.span
            })
            .fold(explicit_minor.max(1), usize::max),
    };
    // (major_start, major_span, minor_start, minor_span)
    let mut placed: Vec<Option<(usize, usize, usize, usize)>> = vec![None; placements.len()];

    // STEP 1: "Process the items locked to a given row/column."
    //
    // Items with a definite position in both axes go first, then items
    // locked to a major-axis track take the first free minor slot there.
    for (slot, p) in placed.iter_mut().zip(placements) {
        let (major, minor) = view(p);
        if let (Some(ms), Some(ns)) = (major.start, minor.start) {
            occupancy.mark(ms..ms + major.span, ns..ns + minor.span);
            *slot = Some((ms, major.span, ns, minor.span));
        }
    }
    for (slot, p) in placed.iter_mut().zip(placements) {
        let (major, minor) = view(p);
        if let (Some(ms), None) = (major.start, minor.start) {
            let mut ns = 0;
            while !occupancy.is_free(ms..ms + major.span, ns..ns + minor.span) {
                ns += 1;
            }
            occupancy.mark(ms..ms + major.span, ns..ns + minor.span);
            *slot = Some((ms, major.span, ns, minor.span));
        }
    }

    // STEP 2: "Position the remaining grid items."
    //
    // "The auto-placement cursor defines the current 'insertion point' in
    // the grid." In dense mode the cursor restarts at the first cell for
    // every item.
    let mut cursor = (0, 0);
    for (slot, p) in placed.iter_mut().zip(placements) {
        if slot.is_some() {
            continue;
        }
        let (major, minor) = view(p);
        if dense {
            cursor = (0, 0);
        }
        let (ms, ns) = if let Some(ns) = minor.start {
            // "Set the column position of the cursor to the grid item's
            // column-start line. If this is less than the previous column
            // position of the cursor, increment the row position by 1."
            let mut ms = cursor.0;
            if !dense && ns < cursor.1 {
                ms += 1;
            }
            while !occupancy.is_free(ms..ms + major.span, ns..ns + minor.span) {
                ms += 1;
            }
            (ms, ns)
        } else {
            // "Increment the column position of the auto-placement cursor
            // until either this item's grid area does not overlap any
            // occupied grid cells, or the cursor's column position, plus the
            // item's column span, overflow the number of columns in the
            // implicit grid."
            let (mut ms, mut ns) = cursor;
            loop {
                if ns + minor.span > occupancy.minor_len {
                    ms += 1;
                    ns = 0;
                    continue;
                }
                if occupancy.is_free(ms..ms + major.span, ns..ns + minor.span) {
                    break;
                }
                ns += 1;
            }
            (ms, ns)
        };
        occupancy.mark(ms..ms + major.span, ns..ns + minor.span);
        *slot = Some((ms, major.span, ns, minor.span));
        cursor = (ms, ns + minor.span);
    }

    placed
        .into_iter()
        .map(|slot| {
            let (ms, mspan, ns, nspan) = slot.unwrap_or((0, 1, 0, 1));
            if is_row {
                GridArea {
                    row_start: ms,
                    row_end: ms + mspan,
                    col_start: ns,
                    col_end: ns + nspan,
                }
            } else {
                GridArea {
                    col_start: ms,
                    col_end: ms + mspan,
                    row_start: ns,
                    row_end: ns + nspan,
                }
            }
        })
        .collect()
}

/// [§ 6.2 Grid Item Sizing](https://www.w3.org/TR/css-grid-1/#grid-item-sizing)
///
/// Measure the item's min- and max-content widths and report its outer
/// contribution to the column it spans.
fn column_contribution(
    tree: &mut LayoutTree,
    item: &mut GridItem,
    inner: Size<Option<f64>>,
) -> Contribution {
    let (min_content, max_content) = match item.size.width {
        Some(width) => (width, width),
        None => {
            let mut measure = |mode: AvailableSpace| {
                compute::compute_node(
                    tree,
                    item.node,
                    LayoutInput::measure(
                        Size::new(None, item.size.height),
                        inner,
                        Size::new(mode, AvailableSpace::MaxContent),
                    ),
                )
                .size
                .width
            };
            let min = measure(AvailableSpace::MinContent);
            let max = measure(AvailableSpace::MaxContent);
            (min, max.max(min))
        }
    };
    item.min_content_width = min_content;
    item.max_content_width = max_content;

    let clamp = |w: f64| {
        clamp_size(w, item.min_size.width, item.max_size.width).max(item.padding_border.width)
            + item.margin.horizontal()
    };
    Contribution {
        start: item.area.col_start,
        span: item.area.col_end - item.area.col_start,
        min_content: clamp(min_content),
        max_content: clamp(max_content),
    }
}

/// Decide the item's used width inside its column area and report the
/// resulting outer height as its row contribution.
///
/// [§ 11.3 Stretch](https://www.w3.org/TR/css-align-3/#justify-self-property)
fn row_contribution(
    tree: &mut LayoutTree,
    item: &mut GridItem,
    area_width: f64,
    inner: Size<Option<f64>>,
) -> Contribution {
    let available = (area_width - item.margin.horizontal()).max(0.0);
    let width = match item.size.width {
        Some(width) => width,
        None if item.justify_self == AlignItems::Stretch
            && !item.margin_auto.left
            && !item.margin_auto.right =>
        {
            available
        }
        // Fit-content: "min(max-content size, max(min-content size,
        // available space))".
        None => item
            .max_content_width
            .min(available.max(item.min_content_width)),
    };
    item.width =
        clamp_size(width, item.min_size.width, item.max_size.width).max(item.padding_border.width);

    let height = match item.size.height {
        Some(height) => height,
        None => {
            compute::compute_node(
                tree,
                item.node,
                LayoutInput::measure(
                    Size::new(Some(item.width), None),
                    inner,
                    Size::new(
                        AvailableSpace::Definite(item.width),
                        AvailableSpace::MaxContent,
                    ),
                ),
            )
            .size
            .height
        }
    };
    item.content_height =
        clamp_size(height, item.min_size.height, item.max_size.height).max(item.padding_border.height);

    let outer = item.content_height + item.margin.vertical();
    Contribution {
        start: item.area.row_start,
        span: item.area.row_end - item.area.row_start,
        min_content: outer,
        max_content: outer,
    }
}

/// The item's used height inside a row area of `area_height`.
fn item_height(item: &GridItem, area_height: f64) -> f64 {
    if item.size.height.is_none()
        && item.align_self == AlignItems::Stretch
        && !item.margin_auto.top
        && !item.margin_auto.bottom
    {
        clamp_size(
            area_height - item.margin.vertical(),
            item.min_size.height,
            item.max_size.height,
        )
        .max(item.padding_border.height)
    } else {
        item.content_height
    }
}

/// [§ 6.1 Grid Item Alignment](https://www.w3.org/TR/css-grid-1/#alignment)
///
/// Offset of an item's border box from its area's start edge (after the
/// start margin). Auto margins absorb positive free space first.
/// `baseline` falls back to `start`.
fn align_offset(align: AlignItems, free: f64, auto_start: bool, auto_end: bool) -> f64 {
    if auto_start || auto_end {
        let free = free.max(0.0);
        return match (auto_start, auto_end) {
            (true, true) => free / 2.0,
            (true, false) => free,
            _ => 0.0,
        };
    }
    match align {
        AlignItems::FlexEnd => free,
        AlignItems::Center => free / 2.0,
        AlignItems::FlexStart | AlignItems::Stretch | AlignItems::Baseline => 0.0,
    }
}

const fn is_intrinsic(sizing: TrackSizing) -> bool {
    matches!(
        sizing,
        TrackSizing::MinContent | TrackSizing::MaxContent | TrackSizing::Auto
    )
}

/// [§ 12.3 Track Sizing Algorithm](https://www.w3.org/TR/css-grid-1/#algo-track-sizing)
///
/// Returns the used size of every track in one axis.
fn size_tracks(
    sizings: &[TrackSizing],
    contributions: &[Contribution],
    available: AvailableSpace,
    gap: f64,
    distribution: JustifyContent,
) -> Vec<f64> {
    let basis = available.definite();
    let gaps = gap * sizings.len().saturating_sub(1) as f64;

    // STEP 1 (§ 12.4): Initialize track sizes.
    //
    // "If the track's max track sizing function is a percentage and the
    // grid container's size is indefinite, treat it as auto."
    //
    // Intrinsic and flexible tracks start with an infinite growth limit.
    let mut tracks: Vec<Track> = sizings
        .iter()
        .map(|&sizing| {
            let sizing = match sizing {
                TrackSizing::Percent(_) if basis.is_none() => TrackSizing::Auto,
                other => other,
            };
            let fixed = sizing.fixed_size(basis);
            Track {
                sizing,
                base: fixed.unwrap_or(0.0),
                limit: fixed.unwrap_or(f64::INFINITY),
                infinitely_growable: false,
            }
        })
        .collect();

    // STEP 2 (§ 12.5 step 2): "Size tracks to fit non-spanning items."
    for c in contributions.iter().filter(|c| c.span == 1) {
        let Some(track) = tracks.get_mut(c.start) else {
            continue;
        };
        match track.sizing {
            TrackSizing::MinContent => {
                track.base = track.base.max(c.min_content);
                track.raise_limit(c.min_content);
            }
            TrackSizing::MaxContent => {
                track.base = track.base.max(c.max_content);
                track.raise_limit(c.max_content);
            }
            TrackSizing::Auto | TrackSizing::Fr(_) => {
                track.base = track.base.max(c.min_content);
                track.raise_limit(c.max_content);
            }
            TrackSizing::Points(_) | TrackSizing::Percent(_) => {}
        }
    }
    for track in &mut tracks {
        track.limit = track.limit.max(track.base);
    }

    // STEP 3 (§ 12.5 step 3): "Increase sizes to accommodate spanning items
    // crossing content-sized tracks", smallest spans first.
    let (mut spanning, crossing_flexible): (Vec<&Contribution>, Vec<&Contribution>) = contributions
        .iter()
        .filter(|c| c.span > 1)
        .partition(|c| !crosses_flexible(&tracks, c));
    spanning.sort_by_key(|c| c.span);
    for c in spanning {
        let range = c.start..(c.start + c.span).min(tracks.len());
        let span_gaps = gap * range.len().saturating_sub(1) as f64;
        let affected = |tracks: &[Track], pick: fn(TrackSizing) -> bool| -> Vec<usize> {
            range.clone().filter(|&i| pick(tracks[i].sizing)).collect()
        };

        // "For intrinsic minimums: First increase the base size of tracks
        // with an intrinsic min track sizing function by distributing extra
        // space as needed to accommodate these items' minimum
        // contributions."
        let intrinsic = affected(&tracks, is_intrinsic);
        if intrinsic.is_empty() {
            continue;
        }
        distribute_to_bases(&mut tracks, range.clone(), &intrinsic, c.min_content - span_gaps);

        // "For max-content minimums: Lastly continue to increase the base
        // size of tracks with a max-content min track sizing function by
        // distributing extra space as needed to account for these items'
        // max-content contributions."
        let max_content = affected(&tracks, |s| s == TrackSizing::MaxContent);
        distribute_to_bases(&mut tracks, range.clone(), &max_content, c.max_content - span_gaps);

        // "If at this point any track's growth limit is now less than its
        // base size, increase its growth limit to match its base size."
        for &i in &intrinsic {
            tracks[i].limit = tracks[i].limit.max(tracks[i].base);
        }

        // "For intrinsic maximums: Next increase the growth limit of tracks
        // with an intrinsic max track sizing function by distributing extra
        // space as needed to account for these items' min-content
        // contributions."
        distribute_to_limits(&mut tracks, range.clone(), &intrinsic, c.min_content - span_gaps);

        // "For max-content maximums: Lastly continue to increase the growth
        // limit of tracks with a max-content max track sizing function by
        // distributing extra space as needed to account for these items'
        // max-content contributions."
        let max_content_max = affected(&tracks, |s| {
            matches!(s, TrackSizing::MaxContent | TrackSizing::Auto)
        });
        distribute_to_limits(&mut tracks, range, &max_content_max, c.max_content - span_gaps);
    }

    // STEP 3b (§ 12.5 step 4): "Increase sizes to accommodate spanning
    // items crossing flexible tracks."
    //
    // "If the sum of the flexible sizing functions of all flexible tracks
    // spanned by the item is greater than zero, distributing space to such
    // tracks according to the ratios of their flexible sizing functions
    // rather than distributing space equally."
    for c in crossing_flexible {
        let range = c.start..(c.start + c.span).min(tracks.len());
        let flexible: Vec<usize> = range
            .clone()
            .filter(|&i| tracks[i].sizing.flex_factor().is_some())
            .collect();
        let span_gaps = gap * (range.len() - 1) as f64;
        let extra = c.min_content - span_gaps - tracks[range].iter().map(|t| t.base).sum::<f64>();
        if extra <= 0.0 {
            continue;
        }
        let factor = |i: usize| tracks[i].sizing.flex_factor().unwrap_or(0.0).max(0.0);
        let factor_sum: f64 = flexible.iter().map(|&i| factor(i)).sum();
        let shares: Vec<f64> = flexible
            .iter()
            .map(|&i| {
                if factor_sum > 0.0 {
                    extra * factor(i) / factor_sum
                } else {
                    extra / flexible.len() as f64
                }
            })
            .collect();
        for (&i, share) in flexible.iter().zip(shares) {
            let track = &mut tracks[i];
            track.base += share;
            track.limit = track.limit.max(track.base);
        }
    }

    // "If any track still has an infinite growth limit (because, for
    // example, it had no items placed in it or it is a flexible track), set
    // its growth limit to its base size."
    for track in &mut tracks {
        if track.limit.is_infinite() {
            track.limit = track.base;
        }
    }

    // STEP 4 (§ 12.6): Maximize tracks.
    //
    // "If the free space is positive, distribute it equally to the base
    // sizes of all tracks, freezing tracks as they reach their growth
    // limits."
    match available {
        AvailableSpace::Definite(inner) => {
            let mut free = inner - gaps - tracks.iter().map(|t| t.base).sum::<f64>();
            let mut growable: Vec<usize> = (0..tracks.len())
                .filter(|&i| tracks[i].sizing.flex_factor().is_none())
                .filter(|&i| tracks[i].limit - tracks[i].base > EPSILON)
                .collect();
            while free > EPSILON && !growable.is_empty() {
                let share = free / growable.len() as f64;
                let mut still_growing = Vec::with_capacity(growable.len());
                for i in growable {
                    let track = &mut tracks[i];
                    let grow = share.min(track.limit - track.base);
                    track.base += grow;
                    free -= grow;
                    if track.limit - track.base > EPSILON {
                        still_growing.push(i);
                    }
                }
                growable = still_growing;
            }
        }
        // "For the purpose of this step: if sizing the grid container under
        // a max-content constraint, the free space is infinite."
        AvailableSpace::MaxContent => {
            for track in tracks.iter_mut().filter(|t| t.sizing.flex_factor().is_none()) {
                track.base = track.limit;
            }
        }
        // "if sizing under a min-content constraint, the free space is zero."
        AvailableSpace::MinContent => {}
    }

    // STEP 5 (§ 12.7): Expand flexible tracks.
    let has_flexible = tracks.iter().any(|t| t.sizing.flex_factor().is_some());
    if has_flexible {
        let fr_size = match available {
            AvailableSpace::Definite(inner) => find_fr_size(&tracks, inner - gaps),
            // "If the free space is an indefinite length: The used flex
            // fraction is the maximum of: For each flexible track, if the
            // flexible track's flex factor is greater than one, the result
            // of dividing the track's base size by its flex factor;
            // otherwise, the track's base size."
            //
            // The max-content contributions are the sizes in question here.
            //
            // "For each grid item that crosses a flexible track, the result
            // of finding the size of an fr using all the grid tracks that
            // the item crosses and a space to fill of the item's
            // max-content contribution."
            AvailableSpace::MaxContent => {
                let per_track = tracks
                    .iter()
                    .filter_map(|t| {
                        t.sizing.flex_factor().map(|factor| {
                            if factor > 1.0 {
                                t.limit / factor
                            } else {
                                t.limit
                            }
                        })
                    })
                    .fold(0.0, f64::max);
                contributions
                    .iter()
                    .filter(|c| c.span > 1 && crosses_flexible(&tracks, c))
                    .map(|c| {
                        let range = c.start..(c.start + c.span).min(tracks.len());
                        let span_gaps = gap * (range.len() - 1) as f64;
                        find_fr_size(&tracks[range], c.max_content - span_gaps)
                    })
                    .fold(per_track, f64::max)
            }
            AvailableSpace::MinContent => 0.0,
        };
        for track in &mut tracks {
            if let Some(factor) = track.sizing.flex_factor() {
                track.base = track.base.max(factor.max(0.0) * fr_size);
            }
        }
    }

    // STEP 6 (§ 12.8): Stretch auto tracks.
    //
    // "When the content-distribution property of the grid container is
    // normal or stretch in this axis, this step expands tracks that have an
    // auto max track sizing function by dividing any remaining positive,
    // definite free space equally amongst them."
    if matches!(distribution, JustifyContent::Normal | JustifyContent::Stretch)
        && let AvailableSpace::Definite(inner) = available
    {
        let free = inner - gaps - tracks.iter().map(|t| t.base).sum::<f64>();
        let autos = tracks
            .iter()
            .filter(|t| t.sizing == TrackSizing::Auto)
            .count();
        if free > EPSILON && autos > 0 {
            let share = free / autos as f64;
            for track in tracks.iter_mut().filter(|t| t.sizing == TrackSizing::Auto) {
                track.base += share;
            }
        }
    }

    tracks.into_iter().map(|t| t.base).collect()
}

/// Whether the item's span includes a track with an `fr` sizing function.
fn crosses_flexible(tracks: &[Track], c: &Contribution) -> bool {
    tracks
        .iter()
        .skip(c.start)
        .take(c.span)
        .any(|t| t.sizing.flex_factor().is_some())
}

/// [§ 12.5.1 Distributing Extra Space Across Spanned Tracks](https://www.w3.org/TR/css-grid-1/#extra-space)
///
/// Grow the base sizes of `affected` until the tracks in `span` add up to
/// `size`.
///
/// "Distribute space to base sizes up to growth limits: Find the
/// item-incurred increase for each spanned track with an affected size by:
/// distributing the space equally among such tracks, freezing a track's
/// item-incurred increase as its affected size + item-incurred increase
/// reaches its limit." Whatever is left once every track is frozen is
/// shared equally, past the limits.
fn distribute_to_bases(tracks: &mut [Track], span: Range<usize>, affected: &[usize], size: f64) {
    let mut extra = size - tracks[span].iter().map(|t| t.base).sum::<f64>();
    if extra <= EPSILON || affected.is_empty() {
        return;
    }
    let mut unfrozen: Vec<usize> = affected
        .iter()
        .copied()
        .filter(|&i| tracks[i].limit - tracks[i].base > EPSILON)
        .collect();
    while extra > EPSILON && !unfrozen.is_empty() {
        let share = extra / unfrozen.len() as f64;
        let mut still_unfrozen = Vec::with_capacity(unfrozen.len());
        for i in unfrozen {
            let track = &mut tracks[i];
            let grow = share.min(track.limit - track.base);
            track.base += grow;
            extra -= grow;
            if track.limit - track.base > EPSILON {
                still_unfrozen.push(i);
            }
        }
        unfrozen = still_unfrozen;
    }
    // "Distribute space beyond limits."
    if extra > EPSILON {
        let share = extra / affected.len() as f64;
        for &i in affected {
            tracks[i].base += share;
        }
    }
}

/// [§ 12.5.1 Distributing Extra Space Across Spanned Tracks](https://www.w3.org/TR/css-grid-1/#extra-space)
///
/// Grow the growth limits of `affected` until the tracks in `span` add up
/// to `size`, counting an infinite limit as the base size. Tracks whose
/// limit was infinite take the space first.
fn distribute_to_limits(tracks: &mut [Track], span: Range<usize>, affected: &[usize], size: f64) {
    let extra = size
        - tracks[span]
            .iter()
            .map(|t| if t.limit.is_finite() { t.limit } else { t.base })
            .sum::<f64>();
    let mut growable: Vec<usize> = affected
        .iter()
        .copied()
        .filter(|&i| tracks[i].limit.is_infinite() || tracks[i].infinitely_growable)
        .collect();
    for &i in affected {
        let track = &mut tracks[i];
        if track.limit.is_infinite() {
            track.limit = track.base;
            track.infinitely_growable = true;
        }
    }
    if extra <= EPSILON || affected.is_empty() {
        return;
    }
    if growable.is_empty() {
        growable = affected.to_vec();
    }
    let share = extra / growable.len() as f64;
    for i in growable {
        tracks[i].limit += share;
    }
}

/// [§ 12.7.1 Find the Size of an fr](https://www.w3.org/TR/css-grid-1/#algo-find-fr-size)
///
/// "Let leftover space be the space to fill minus the base sizes of the
/// non-flexible grid tracks. Let flex factor sum be the sum of the flex
/// factors of the flexible tracks. If this value is less than 1, set it to
/// 1 instead. Let the hypothetical fr size be the leftover space divided by
/// the flex factor sum. If the product of the hypothetical fr size and a
/// flexible track's flex factor is less than the track's base size,
/// restart this algorithm treating all such tracks as inflexible."
fn find_fr_size(tracks: &[Track], space: f64) -> f64 {
    let mut inflexible: Vec<bool> = tracks
        .iter()
        .map(|t| t.sizing.flex_factor().is_none())
        .collect();

    for _round in 0..=tracks.len() {
        let leftover = space
            - tracks
                .iter()
                .zip(&inflexible)
                .filter(|&(_, &fixed)| fixed)
                .map(|(t, _)| t.base)
                .sum::<f64>();
        let factor_sum: f64 = tracks
            .iter()
            .zip(&inflexible)
            .filter(|&(_, &fixed)| !fixed)
            .filter_map(|(t, _)| t.sizing.flex_factor())
            .map(|f| f.max(0.0))
            .sum();
        if factor_sum <= 0.0 {
            return 0.0;
        }
        let fr_size = leftover.max(0.0) / factor_sum.max(1.0);

        let mut restarted = false;
        for (track, fixed) in tracks.iter().zip(inflexible.iter_mut()) {
            if *fixed {
                continue;
            }
            let factor = track.sizing.flex_factor().unwrap_or(0.0).max(0.0);
            if fr_size * factor < track.base - EPSILON {
                *fixed = true;
                restarted = true;
            }
        }
        if !restarted {
            return fr_size;
        }
    }
    0.0
}

/// [§ 10.5 Aligning the Grid](https://www.w3.org/TR/css-grid-1/#grid-align)
///
/// Start offset of every track once `justify-content`/`align-content` has
/// distributed the leftover space. `normal` and `stretch` were already
/// applied by stretching `auto` tracks.
fn track_offsets(sizes: &[f64], gap: f64, inner: f64, distribution: JustifyContent) -> Vec<f64> {
    let free = inner - span_with_gaps(sizes, gap);
    let (start, between) = match distribution {
        JustifyContent::Normal | JustifyContent::Stretch => (0.0, 0.0),
        keyword => compute_justify_offsets(keyword, free, sizes.len()),
    };
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = start;
    for &size in sizes {
        offsets.push(cursor);
        cursor += size + gap + between;
    }
    offsets
}

/// Total size of a run of tracks including the gaps between them.
fn span_with_gaps(sizes: &[f64], gap: f64) -> f64 {
    sizes.iter().sum::<f64>() + gap * sizes.len().saturating_sub(1) as f64
}

/// The extent of the area covering `range`, including gaps and any
/// distributed space between its tracks.
fn area_extent(offsets: &[f64], sizes: &[f64], range: Range<usize>) -> f64 {
    let (Some(&start), Some(&last_offset), Some(&last_size)) = (
        offsets.get(range.start),
        offsets.get(range.end.saturating_sub(1)),
        sizes.get(range.end.saturating_sub(1)),
    ) else {
        return 0.0;
    };
    (last_offset + last_size - start).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto_item() -> (AxisPlacement, AxisPlacement) {
        let auto = AxisPlacement {
            start: None,
            span: 1,
        };
        (auto, auto)
    }

    #[test]
    fn test_negative_line_counts_from_explicit_end() {
        assert_eq!(line_index(-1, 3), 3);
        assert_eq!(line_index(1, 3), 0);
        assert_eq!(line_index(-10, 3), 0);
    }

    #[test]
    fn test_lines_and_spans_are_clamped() {
        assert_eq!(line_index(i32::MAX, 1), 999);
        assert_eq!(line_index(i32::MIN, 1), 0);
        assert_eq!(span_of(GridLine::Span(u32::MAX)), 1000);
    }

    #[test]
    fn test_swapped_lines_are_normalized() {
        let placement = GridPlacement {
            start: GridLine::Line(3),
            end: GridLine::Line(1),
        };
        assert_eq!(
            resolve_axis(placement, 2),
            AxisPlacement {
                start: Some(0),
                span: 2
            }
        );
    }

    #[test]
    fn test_row_flow_wraps_into_implicit_rows() {
        let areas = place_items(&[auto_item(); 3], Size::new(2, 0), GridAutoFlow::Row);
        assert_eq!((areas[2].row_start, areas[2].col_start), (1, 0));
    }

    #[test]
    fn test_dense_backfills_holes() {
        let wide = (
            AxisPlacement {
                start: None,
                span: 1,
            },
            AxisPlacement {
                start: None,
                span: 2,
            },
        );
        let items = [auto_item(), wide, auto_item()];
        let sparse = place_items(&items, Size::new(2, 0), GridAutoFlow::Row);
        assert_eq!((sparse[2].row_start, sparse[2].col_start), (2, 0));
        let dense = place_items(&items, Size::new(2, 0), GridAutoFlow::RowDense);
        assert_eq!((dense[2].row_start, dense[2].col_start), (0, 1));
    }

    #[test]
    fn test_fr_tracks_share_leftover() {
        let sizes = size_tracks(
            &[TrackSizing::Points(100.0), TrackSizing::Fr(1.0), TrackSizing::Fr(1.0)],
            &[],
            AvailableSpace::Definite(300.0),
            0.0,
            JustifyContent::Normal,
        );
        assert_eq!(sizes, vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_auto_tracks_stretch_under_normal() {
        let sizes = size_tracks(
            &[TrackSizing::Auto, TrackSizing::Points(50.0)],
            &[Contribution {
                start: 0,
                span: 1,
                min_content: 10.0,
                max_content: 30.0,
            }],
            AvailableSpace::Definite(200.0),
            0.0,
            JustifyContent::Normal,
        );
        assert_eq!(sizes, vec![150.0, 50.0]);
    }

    fn spanning(min_content: f64, max_content: f64) -> Contribution {
        Contribution {
            start: 0,
            span: 2,
            min_content,
            max_content,
        }
    }

    #[test]
    fn test_max_content_track_takes_the_max_content_excess() {
        let sizes = size_tracks(
            &[TrackSizing::MinContent, TrackSizing::MaxContent],
            &[spanning(24.0, 42.0)],
            AvailableSpace::Definite(800.0),
            0.0,
            JustifyContent::Normal,
        );
        assert_eq!(sizes, vec![12.0, 30.0]);
    }

    #[test]
    fn test_spanning_item_grows_unlimited_track_first() {
        let sizes = size_tracks(
            &[TrackSizing::Auto, TrackSizing::Auto],
            &[
                Contribution {
                    start: 0,
                    span: 1,
                    min_content: 50.0,
                    max_content: 50.0,
                },
                spanning(300.0, 300.0),
            ],
            AvailableSpace::Definite(800.0),
            0.0,
            JustifyContent::FlexStart,
        );
        assert_eq!(sizes, vec![50.0, 250.0]);
    }

    #[test]
    fn test_spanning_item_sizes_indefinite_fr_tracks() {
        let sizes = size_tracks(
            &[TrackSizing::Fr(1.0), TrackSizing::Fr(1.0)],
            &[spanning(24.0, 42.0)],
            AvailableSpace::MaxContent,
            0.0,
            JustifyContent::Normal,
        );
        assert_eq!(sizes, vec![21.0, 21.0]);

        let sizes = size_tracks(
            &[TrackSizing::Fr(1.0), TrackSizing::Fr(3.0)],
            &[spanning(0.0, 200.0)],
            AvailableSpace::MaxContent,
            10.0,
            JustifyContent::Normal,
        );
        assert_eq!(sizes, vec![47.5, 142.5]);
    }

    #[test]
    fn test_spanning_item_minimum_grows_definite_fr_tracks() {
        let sizes = size_tracks(
            &[TrackSizing::Fr(1.0), TrackSizing::Fr(1.0)],
            &[spanning(300.0, 300.0)],
            AvailableSpace::Definite(100.0),
            0.0,
            JustifyContent::Normal,
        );
        assert_eq!(sizes, vec![150.0, 150.0]);
    }
}
