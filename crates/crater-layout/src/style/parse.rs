//! Best-effort parser for inline CSS declaration blocks.
//!
//! [§ 3 Declarations](https://www.w3.org/TR/css-syntax-3/#declaration)
//!
//! Accepts `property: value; …` text as found in a `style` attribute or
//! handed to `update_style`, and applies every recognised declaration to a
//! [`Style`]. There is no cascade and no inheritance. Input that cannot be
//! used is repaired rather than rejected, and each repair is reported once
//! through [`warn_once`]:
//!
//! - an unparseable length becomes `auto`;
//! - a negative size, padding, border width or gap becomes `0`;
//! - unknown properties and keywords are skipped.

use std::str::FromStr;

use crater_common::warning::warn_once;

use super::{
    AlignItems, Color, Dimension, Display, FlexDirection, FlexWrap, GridAutoFlow, GridLine,
    GridPlacement, MAX_GRID_LINE, MAX_GRID_TRACKS, Style, TrackSizing,
};
use crate::geometry::Edges;

/// Font size that `em`/`rem` lengths are resolved against.
const ROOT_FONT_SIZE: f64 = 16.0;

/// Apply every declaration in `css` to `style`.
pub fn apply_declarations(style: &mut Style, css: &str) {
    for declaration in css.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let Some((name, value)) = declaration.split_once(':') else {
            warn_once("Style", &format!("malformed declaration '{declaration}'"));
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map_or(value, str::trim_end);
        apply_declaration(style, &name, value);
    }
}

/// Apply a single `name: value` declaration. `name` must be lowercase.
pub fn apply_declaration(style: &mut Style, name: &str, value: &str) {
    match name {
        // [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
        //
        // "The display property defines an element's display type."
        //
        // Inline-level outer display types are laid out as their block-level
        // counterparts.
        "display" => match value.trim().to_ascii_lowercase().as_str() {
            "inline" | "inline-block" => style.display = Display::Block,
            "inline-flex" => style.display = Display::Flex,
            "inline-grid" => style.display = Display::Grid,
            _ => set_keyword(&mut style.display, name, value),
        },
        "position" => set_keyword(&mut style.position, name, value),
        "box-sizing" => set_keyword(&mut style.box_sizing, name, value),
        "overflow" => set_keyword(&mut style.overflow, name, value),

        // [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
        "top" => style.inset.top = length(name, value),
        "right" => style.inset.right = length(name, value),
        "bottom" => style.inset.bottom = length(name, value),
        "left" => style.inset.left = length(name, value),
        "inset" => {
            if let Some(edges) = edges_shorthand(name, value, length) {
                style.inset = edges;
            }
        }

        // [§ 10.2 Content width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
        //
        // "Negative values for 'width' are illegal."
        "width" => style.size.width = non_negative_length(name, value),
        "height" => style.size.height = non_negative_length(name, value),
        "min-width" => style.min_size.width = non_negative_length(name, value),
        "min-height" => style.min_size.height = non_negative_length(name, value),
        "max-width" => style.max_size.width = max_length(name, value),
        "max-height" => style.max_size.height = max_length(name, value),

        // [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        //
        // "Negative values for margin properties are allowed."
        "margin" => {
            if let Some(edges) = edges_shorthand(name, value, length) {
                style.margin = edges;
            }
        }
        "margin-top" => style.margin.top = length(name, value),
        "margin-right" => style.margin.right = length(name, value),
        "margin-bottom" => style.margin.bottom = length(name, value),
        "margin-left" => style.margin.left = length(name, value),

        // [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
        //
        // "Unlike margin properties, values for padding values cannot be
        // negative."
        "padding" => {
            if let Some(edges) = edges_shorthand(name, value, non_negative_length) {
                style.padding = edges;
            }
        }
        "padding-top" => style.padding.top = non_negative_length(name, value),
        "padding-right" => style.padding.right = non_negative_length(name, value),
        "padding-bottom" => style.padding.bottom = non_negative_length(name, value),
        "padding-left" => style.padding.left = non_negative_length(name, value),

        // [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
        "border-width" => {
            if let Some(edges) = edges_shorthand(name, value, border_width) {
                style.border = edges;
            }
        }
        "border-top-width" => style.border.top = border_width(name, value),
        "border-right-width" => style.border.right = border_width(name, value),
        "border-bottom-width" => style.border.bottom = border_width(name, value),
        "border-left-width" => style.border.left = border_width(name, value),
        // [§ 8.5.4 Border shorthand properties](https://www.w3.org/TR/CSS2/box.html#border-shorthand-properties)
        //
        // Only the width component matters for layout.
        "border" | "border-top" | "border-right" | "border-bottom" | "border-left" => {
            let width = value
                .split_whitespace()
                .find_map(border_width_token)
                .unwrap_or(Dimension::ZERO);
            match name {
                "border-top" => style.border.top = width,
                "border-right" => style.border.right = width,
                "border-bottom" => style.border.bottom = width,
                "border-left" => style.border.left = width,
                _ => style.border = Edges::all(width),
            }
        }

        // [§ 7 Flexibility](https://www.w3.org/TR/css-flexbox-1/#flexibility)
        "flex-direction" => set_keyword(&mut style.flex_direction, name, value),
        "flex-wrap" => set_keyword(&mut style.flex_wrap, name, value),
        "flex-flow" => {
            for token in value.split_whitespace() {
                if let Ok(direction) = FlexDirection::from_str(token) {
                    style.flex_direction = direction;
                } else if let Ok(wrap) = FlexWrap::from_str(token) {
                    style.flex_wrap = wrap;
                } else {
                    warn_unknown_keyword(name, token);
                }
            }
        }
        "flex-grow" => {
            if let Some(grow) = non_negative_number(name, value) {
                style.flex_grow = grow;
            }
        }
        "flex-shrink" => {
            if let Some(shrink) = non_negative_number(name, value) {
                style.flex_shrink = shrink;
            }
        }
        "flex-basis" => style.flex_basis = non_negative_length(name, value),
        "flex" => apply_flex_shorthand(style, value),
        "order" => match value.parse::<i32>() {
            Ok(order) => style.order = order,
            Err(_) => warn_unknown_keyword(name, value),
        },

        // [CSS Box Alignment Level 3](https://www.w3.org/TR/css-align-3/)
        "justify-content" => set_keyword(&mut style.justify_content, name, value),
        "align-content" => set_keyword(&mut style.align_content, name, value),
        "align-items" => set_keyword(&mut style.align_items, name, value),
        "justify-items" => set_keyword(&mut style.justify_items, name, value),
        "align-self" => style.align_self = self_alignment(name, value),
        "justify-self" => style.justify_self = self_alignment(name, value),
        // "The place-content property is a shorthand for align-content and
        // justify-content... If the second value is omitted, it is copied
        // from the first."
        "place-content" => {
            let (align, justify) = split_pair(value);
            set_keyword(&mut style.align_content, name, align);
            set_keyword(&mut style.justify_content, name, justify);
        }
        "place-items" => {
            let (align, justify) = split_pair(value);
            set_keyword(&mut style.align_items, name, align);
            set_keyword(&mut style.justify_items, name, justify);
        }
        "place-self" => {
            let (align, justify) = split_pair(value);
            style.align_self = self_alignment(name, align);
            style.justify_self = self_alignment(name, justify);
        }

        // [§ 7.2 Explicit Track Sizing](https://www.w3.org/TR/css-grid-1/#track-sizing)
        "grid-template-columns" => style.grid_template_columns = parse_track_list(name, value),
        "grid-template-rows" => style.grid_template_rows = parse_track_list(name, value),
        "grid-auto-columns" => {
            if let Some(track) = single_track(name, value) {
                style.grid_auto_columns = track;
            }
        }
        "grid-auto-rows" => {
            if let Some(track) = single_track(name, value) {
                style.grid_auto_rows = track;
            }
        }
        "grid-auto-flow" => {
            if let Some(flow) = parse_auto_flow(value) {
                style.grid_auto_flow = flow;
            } else {
                warn_unknown_keyword(name, value);
            }
        }
        // [§ 8.4 Placement Shorthands](https://www.w3.org/TR/css-grid-1/#placement-shorthands)
        "grid-column" => style.grid_column = parse_placement(name, value),
        "grid-row" => style.grid_row = parse_placement(name, value),
        "grid-column-start" => style.grid_column.start = parse_grid_line(name, value),
        "grid-column-end" => style.grid_column.end = parse_grid_line(name, value),
        "grid-row-start" => style.grid_row.start = parse_grid_line(name, value),
        "grid-row-end" => style.grid_row.end = parse_grid_line(name, value),

        // [§ 8.1 Row and Column Gutters](https://www.w3.org/TR/css-align-3/#gap-shorthand)
        //
        // "Specifies the gap between rows and between columns. If the
        // column-gap is omitted, it's set to the same value as row-gap."
        "gap" | "grid-gap" => {
            let (row, column) = split_pair(value);
            style.gap.height = gap_length(name, row);
            style.gap.width = gap_length(name, column);
        }
        "row-gap" | "grid-row-gap" => style.gap.height = gap_length(name, value),
        "column-gap" | "grid-column-gap" => style.gap.width = gap_length(name, value),

        // Visual properties carried through to the paint tree.
        "background-color" | "background" => style.background_color = color(name, value),
        "color" => style.color = color(name, value),
        // [§ 3.2 Transparency: the opacity property](https://www.w3.org/TR/css-color-4/#transparency)
        //
        // "Any values outside the range 0 (fully transparent) to 1 (fully
        // opaque) will be clamped to this range."
        "opacity" => {
            let parsed = value
                .strip_suffix('%')
                .map_or_else(|| value.parse::<f64>().ok(), |pct| {
                    pct.trim().parse::<f64>().ok().map(|p| p / 100.0)
                });
            match parsed {
                Some(opacity) if opacity.is_finite() => style.opacity = opacity.clamp(0.0, 1.0),
                _ => warn_unknown_keyword(name, value),
            }
        }
        "font-size" => match parse_dimension(value) {
            Some(Dimension::Points(px)) if px >= 0.0 => style.font_size = px,
            Some(Dimension::Points(_)) => {
                warn_once("Style", &format!("negative {name} '{value}', using 0"));
                style.font_size = 0.0;
            }
            Some(Dimension::Percent(pct)) => style.font_size = ROOT_FONT_SIZE * pct / 100.0,
            _ => warn_unknown_keyword(name, value),
        },

        unknown => {
            warn_once("Style", &format!("unknown property '{unknown}'"));
        }
    }
}

/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Parse `auto`, a percentage or a length. Unitless numbers are pixels;
/// `em`/`rem` resolve against a 16px root font size.
#[must_use]
pub fn parse_dimension(value: &str) -> Option<Dimension> {
    let value = value.trim().to_ascii_lowercase();
    if value == "auto" {
        return Some(Dimension::Auto);
    }
    if let Some(pct) = value.strip_suffix('%') {
        return finite(pct).map(Dimension::Percent);
    }
    if let Some(rem) = value.strip_suffix("rem") {
        return finite(rem).map(|n| Dimension::Points(n * ROOT_FONT_SIZE));
    }
    if let Some(em) = value.strip_suffix("em") {
        return finite(em).map(|n| Dimension::Points(n * ROOT_FONT_SIZE));
    }
    let number = value.strip_suffix("px").unwrap_or(&value);
    finite(number).map(Dimension::Points)
}

fn finite(number: &str) -> Option<f64> {
    number.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A length that may be negative. Unparseable input becomes `auto`.
fn length(name: &str, value: &str) -> Dimension {
    parse_dimension(value).unwrap_or_else(|| {
        warn_once(
            "Style",
            &format!("unparseable {name} '{value}', using auto"),
        );
        Dimension::Auto
    })
}

/// A length that must not be negative: negative values become `0`.
fn non_negative_length(name: &str, value: &str) -> Dimension {
    match length(name, value) {
        Dimension::Points(px) if px < 0.0 => {
            warn_once("Style", &format!("negative {name} '{value}', using 0"));
            Dimension::ZERO
        }
        Dimension::Percent(pct) if pct < 0.0 => {
            warn_once("Style", &format!("negative {name} '{value}', using 0"));
            Dimension::ZERO
        }
        other => other,
    }
}

/// `max-width`/`max-height`: `none` is the initial value.
fn max_length(name: &str, value: &str) -> Dimension {
    if value.eq_ignore_ascii_case("none") {
        Dimension::Auto
    } else {
        non_negative_length(name, value)
    }
}

/// Gaps: `normal` is zero.
fn gap_length(name: &str, value: &str) -> Dimension {
    if value.eq_ignore_ascii_case("normal") {
        Dimension::ZERO
    } else {
        match non_negative_length(name, value) {
            Dimension::Auto => Dimension::ZERO,
            other => other,
        }
    }
}

/// [§ 8.5.1](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
///
/// "The interpretation of the first three values depends on the user
/// agent." Crater uses 1px, 3px and 5px.
fn border_width_token(token: &str) -> Option<Dimension> {
    match token.to_ascii_lowercase().as_str() {
        "thin" => Some(Dimension::Points(1.0)),
        "medium" => Some(Dimension::Points(3.0)),
        "thick" => Some(Dimension::Points(5.0)),
        "none" | "hidden" => Some(Dimension::ZERO),
        other => match parse_dimension(other) {
            Some(Dimension::Points(px)) => Some(Dimension::Points(px.max(0.0))),
            _ => None,
        },
    }
}

fn border_width(name: &str, value: &str) -> Dimension {
    border_width_token(value).unwrap_or_else(|| non_negative_length(name, value))
}

/// [§ 9.2 Shorthand properties](https://www.w3.org/TR/css-cascade-4/#shorthand)
///
/// "If there is only one component value, it applies to all sides. If there
/// are two values, the top and bottom are set to the first value and the
/// right and left are set to the second. If there are three values, the top
/// is set to the first value, the left and right are set to the second, and
/// the bottom is set to the third. If there are four values, they apply to
/// the top, right, bottom, and left, respectively."
fn edges_shorthand(
    name: &str,
    value: &str,
    parse: fn(&str, &str) -> Dimension,
) -> Option<Edges<Dimension>> {
    let values: Vec<Dimension> = value.split_whitespace().map(|v| parse(name, v)).collect();
    let (top, right, bottom, left) = match values.as_slice() {
        [all] => (*all, *all, *all, *all),
        [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
        [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
        [top, right, bottom, left] => (*top, *right, *bottom, *left),
        _ => {
            warn_once("Style", &format!("invalid {name} shorthand '{value}'"));
            return None;
        }
    };
    Some(Edges {
        top,
        right,
        bottom,
        left,
    })
}

/// Split `a b` into `(a, b)`, or `(a, a)` for a single value.
fn split_pair(value: &str) -> (&str, &str) {
    let mut parts = value.split_whitespace();
    let first = parts.next().unwrap_or("");
    (first, parts.next().unwrap_or(first))
}

fn set_keyword<T: FromStr>(field: &mut T, name: &str, value: &str) {
    match T::from_str(value.trim()) {
        Ok(parsed) => *field = parsed,
        Err(_) => warn_unknown_keyword(name, value),
    }
}

fn warn_unknown_keyword(name: &str, value: &str) {
    warn_once("Style", &format!("unsupported {name} value '{value}', ignored"));
}

fn self_alignment(name: &str, value: &str) -> Option<AlignItems> {
    if value.trim().eq_ignore_ascii_case("auto") {
        return None;
    }
    AlignItems::from_str(value.trim()).map_or_else(
        |_| {
            warn_unknown_keyword(name, value);
            None
        },
        Some,
    )
}

fn non_negative_number(name: &str, value: &str) -> Option<f64> {
    match finite(value) {
        Some(n) if n < 0.0 => {
            warn_once("Style", &format!("negative {name} '{value}', using 0"));
            Some(0.0)
        }
        Some(n) => Some(n),
        None => {
            warn_unknown_keyword(name, value);
            None
        }
    }
}

/// [§ 7.1.1 Basic Values of flex](https://www.w3.org/TR/css-flexbox-1/#flex-common)
///
/// "flex: initial: equivalent to flex: 0 1 auto."
/// "flex: auto: equivalent to flex: 1 1 auto."
/// "flex: none: equivalent to flex: 0 0 auto."
/// "flex: <positive-number>: equivalent to flex: <positive-number> 1 0."
fn apply_flex_shorthand(style: &mut Style, value: &str) {
    let (grow, shrink, basis) = match value.trim().to_ascii_lowercase().as_str() {
        "none" => (0.0, 0.0, Dimension::Auto),
        "auto" => (1.0, 1.0, Dimension::Auto),
        "initial" => (0.0, 1.0, Dimension::Auto),
        _ => {
            let mut grow = None;
            let mut shrink = None;
            let mut basis = None;
            for token in value.split_whitespace() {
                match finite(token) {
                    Some(n) if grow.is_none() => grow = Some(n.max(0.0)),
                    Some(n) if shrink.is_none() && basis.is_none() => shrink = Some(n.max(0.0)),
                    _ => basis = Some(non_negative_length("flex-basis", token)),
                }
            }
            (
                grow.unwrap_or(1.0),
                shrink.unwrap_or(1.0),
                basis.unwrap_or(Dimension::ZERO),
            )
        }
    };
    style.flex_grow = grow;
    style.flex_shrink = shrink;
    style.flex_basis = basis;
}

/// [§ 7.2 Explicit Track Sizing](https://www.w3.org/TR/css-grid-1/#track-sizing)
///
/// Parse a track list, expanding `repeat(<count>, <tracks>…)`. `none` is
/// the empty list. Unparseable tracks become `auto`. The expanded list is
/// cut off at [`MAX_GRID_TRACKS`].
#[must_use]
pub fn parse_track_list(name: &str, value: &str) -> Vec<TrackSizing> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    let mut tracks = Vec::new();
    let mut truncated = false;
    for token in split_top_level(value) {
        let lower = token.to_ascii_lowercase();
        // [§ 7.2.3 Repeating Rows and Columns](https://www.w3.org/TR/css-grid-1/#repeat-notation)
        //
        // "The generic form of the repeat() syntax is, approximately,
        // repeat( [ <integer [1,∞]> ] , [ <line-names>? <track-size> ]+
        // <line-names>? )"
        if let Some(inner) = lower
            .strip_prefix("repeat(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let Some((count, pattern)) = inner.split_once(',') else {
                warn_once("Style", &format!("invalid repeat() in {name}: '{token}'"));
                continue;
            };
            let Ok(count) = count.trim().parse::<u64>() else {
                warn_once(
                    "Style",
                    &format!("unsupported repeat() count in {name}: '{token}'"),
                );
                continue;
            };
            let pattern = parse_track_list(name, pattern);
            let room = MAX_GRID_TRACKS - tracks.len();
            let wanted = usize::try_from(count)
                .unwrap_or(usize::MAX)
                .saturating_mul(pattern.len());
            truncated |= wanted > room;
            tracks.extend(pattern.iter().cycle().take(wanted.min(room)));
        } else if tracks.len() < MAX_GRID_TRACKS {
            tracks.push(parse_track(name, &lower));
        } else {
            truncated = true;
        }
    }
    if truncated {
        warn_once(
            "Style",
            &format!("{name} truncated to {MAX_GRID_TRACKS} tracks"),
        );
    }
    tracks
}

fn single_track(name: &str, value: &str) -> Option<TrackSizing> {
    let tracks = parse_track_list(name, value);
    tracks.first().copied()
}

/// [§ 7.2.1 Track Sizes](https://www.w3.org/TR/css-grid-1/#track-sizes)
///
/// `minmax(min, max)` keeps its maximum, which decides how the track grows.
fn parse_track(name: &str, token: &str) -> TrackSizing {
    if let Some(args) = token
        .strip_prefix("minmax(")
        .and_then(|rest| rest.strip_suffix(')'))
        && let Some((_, max)) = args.split_once(',')
    {
        return parse_track(name, max.trim());
    }
    match token {
        "auto" => TrackSizing::Auto,
        "min-content" => TrackSizing::MinContent,
        "max-content" => TrackSizing::MaxContent,
        _ => {
            if let Some(fr) = token.strip_suffix("fr").and_then(finite) {
                return TrackSizing::Fr(fr.max(0.0));
            }
            match parse_dimension(token) {
                Some(Dimension::Points(px)) => TrackSizing::Points(px.max(0.0)),
                Some(Dimension::Percent(pct)) => TrackSizing::Percent(pct.max(0.0)),
                Some(Dimension::Auto) => TrackSizing::Auto,
                None => {
                    warn_once(
                        "Style",
                        &format!("unparseable track in {name} '{token}', using auto"),
                    );
                    TrackSizing::Auto
                }
            }
        }
    }
}

/// Split on whitespace outside parentheses.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = None;
    for (i, c) in value.char_indices() {
        match c {
            '(' => {
                depth += 1;
                start.get_or_insert(i);
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    parts.push(&value[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        parts.push(&value[s..]);
    }
    parts
}

/// [§ 7.7 grid-auto-flow](https://www.w3.org/TR/css-grid-1/#grid-auto-flow-property)
///
/// "Value: [ row | column ] || dense"
fn parse_auto_flow(value: &str) -> Option<GridAutoFlow> {
    let mut column = false;
    let mut dense = false;
    for token in value.split_whitespace() {
        match token.to_ascii_lowercase().as_str() {
            "row" => column = false,
            "column" => column = true,
            "dense" => dense = true,
            _ => return None,
        }
    }
    Some(match (column, dense) {
        (false, false) => GridAutoFlow::Row,
        (true, false) => GridAutoFlow::Column,
        (false, true) => GridAutoFlow::RowDense,
        (true, true) => GridAutoFlow::ColumnDense,
    })
}

/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// "`<grid-line>` = auto | <integer> | span <integer>"
///
/// Lines and spans beyond [`MAX_GRID_LINE`] are clamped to it.
#[must_use]
pub fn parse_grid_line(name: &str, value: &str) -> GridLine {
    let value = value.trim().to_ascii_lowercase();
    if value == "auto" {
        return GridLine::Auto;
    }
    if let Some(span) = value.strip_prefix("span") {
        return match span.trim().parse::<u64>() {
            Ok(n) if n > 0 => {
                let clamped = n.min(u64::from(MAX_GRID_LINE.unsigned_abs())) as u32;
                if u64::from(clamped) != n {
                    warn_clamped_line(name, &value, i64::from(clamped));
                }
                GridLine::Span(clamped)
            }
            _ => {
                warn_unknown_keyword(name, &value);
                GridLine::Auto
            }
        };
    }
    match value.parse::<i64>() {
        // "A value of zero makes the declaration invalid."
        Ok(n) if n != 0 => {
            let limit = i64::from(MAX_GRID_LINE);
            let clamped = n.clamp(-limit, limit);
            if clamped != n {
                warn_clamped_line(name, &value, clamped);
            }
            GridLine::Line(clamped as i32)
        }
        _ => {
            warn_unknown_keyword(name, &value);
            GridLine::Auto
        }
    }
}

fn warn_clamped_line(name: &str, value: &str, clamped: i64) {
    warn_once(
        "Style",
        &format!("{name} value '{value}' out of range, clamped to {clamped}"),
    );
}

/// "`grid-row` / `grid-column`: <grid-line> [ / <grid-line> ]?"
///
/// "When the second value is omitted, if the first value is a
/// <custom-ident>, the grid-row-end/grid-column-end longhand is also set to
/// that <custom-ident>; otherwise, it is set to auto."
fn parse_placement(name: &str, value: &str) -> GridPlacement {
    match value.split_once('/') {
        Some((start, end)) => GridPlacement {
            start: parse_grid_line(name, start),
            end: parse_grid_line(name, end),
        },
        None => GridPlacement {
            start: parse_grid_line(name, value),
            end: GridLine::Auto,
        },
    }
}

fn color(name: &str, value: &str) -> Option<Color> {
    let parsed = Color::parse(value);
    if parsed.is_none() {
        warn_unknown_keyword(name, value);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_top_level_keeps_functions_whole() {
        assert_eq!(
            split_top_level("100px repeat(2, 1fr 2fr) auto"),
            vec!["100px", "repeat(2, 1fr 2fr)", "auto"]
        );
    }

    #[test]
    fn test_edges_shorthand_three_values() {
        let edges = edges_shorthand("margin", "1px 2px 3px", length);
        assert_eq!(
            edges,
            Some(Edges {
                top: Dimension::Points(1.0),
                right: Dimension::Points(2.0),
                bottom: Dimension::Points(3.0),
                left: Dimension::Points(2.0),
            })
        );
    }
}
