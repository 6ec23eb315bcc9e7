//! CSS Box Model types and resolution.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! [CSS Box Sizing Module Level 3](https://www.w3.org/TR/css-sizing-3/)
//!
//! Everything in this module is pure: it turns a [`Style`] plus a
//! percentage basis into concrete pixel values. Sizes are reported as
//! border-box sizes regardless of `box-sizing`, which is how every layout
//! algorithm in this crate reasons about boxes.

use serde::Serialize;

use crate::geometry::{Edges, Rect, Size};
use crate::style::{BoxSizing, Dimension, Style};

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
///
/// The computed layout of one node. `x`/`y` locate the border box relative
/// to the parent's content box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// Border-box left edge, relative to the parent's content box.
    pub x: f64,
    /// Border-box top edge, relative to the parent's content box.
    pub y: f64,
    /// Border-box width.
    pub width: f64,
    /// Border-box height.
    pub height: f64,
    /// Used margins.
    pub margin: Edges<f64>,
    /// Used border widths.
    pub border: Edges<f64>,
    /// Used padding.
    pub padding: Edges<f64>,
}

impl LayoutResult {
    // [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
    //
    // ┌─────────────────────────────────────────┐
    // │              margin-top                 │
    // │   ┌─────────────────────────────────┐   │
    // │   │          border-top             │   │
    // │   │   ┌─────────────────────────┐   │   │
    // │   │   │      padding-top        │   │   │
    // │   │   │   ┌─────────────────┐   │   │   │
    // │ m │ b │ p │                 │ p │ b │ m │
    // │ a │ o │ a │     CONTENT     │ a │ o │ a │
    // │ r │ r │ d │                 │ d │ r │ r │
    // │ g │ d │ d │                 │ d │ d │ g │
    // │ i │ e │ i │                 │ i │ e │ i │
    // │ n │ r │ n │                 │ n │ r │ n │
    // │   │   │ g │                 │ g │   │   │
    // │   │   │   └─────────────────┘   │   │   │
    // │   │   │      padding-bottom     │   │   │
    // │   │   └─────────────────────────┘   │   │
    // │   │          border-bottom          │   │
    // │   └─────────────────────────────────┘   │
    // │              margin-bottom              │
    // └─────────────────────────────────────────┘
    //
    // A LayoutResult stores the border box directly; the other three boxes
    // are derived from it.

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub const fn border_box(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    ///
    /// ```text
    /// x = x - margin.left
    /// width = width + margin.left + margin.right
    /// ```
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        Rect {
            x: self.x - self.margin.left,
            y: self.y - self.margin.top,
            width: self.width + self.margin.horizontal(),
            height: self.height + self.margin.vertical(),
        }
    }

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    ///
    /// ```text
    /// x = x + border.left
    /// width = width - border.left - border.right
    /// ```
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.x + self.border.left,
            y: self.y + self.border.top,
            width: (self.width - self.border.horizontal()).max(0.0),
            height: (self.height - self.border.vertical()).max(0.0),
        }
    }

    /// "The content box contains the actual content of the element."
    #[must_use]
    pub fn content_box(&self) -> Rect {
        let inset = self.border + self.padding;
        Rect {
            x: self.x + inset.left,
            y: self.y + inset.top,
            width: (self.width - inset.horizontal()).max(0.0),
            height: (self.height - inset.vertical()).max(0.0),
        }
    }
}

/// The resolved margin, border and padding of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxEdges {
    /// Used margins; `auto` sides resolve to 0 here and are reported in
    /// [`BoxEdges::margin_auto`].
    pub margin: Edges<f64>,
    /// Which margin sides were `auto`.
    pub margin_auto: Edges<bool>,
    /// Border widths.
    pub border: Edges<f64>,
    /// Padding.
    pub padding: Edges<f64>,
}

impl BoxEdges {
    /// Padding plus border, per side.
    #[must_use]
    pub fn padding_border(&self) -> Edges<f64> {
        self.padding + self.border
    }

    /// Padding plus border summed per axis: the smallest possible border box.
    #[must_use]
    pub fn padding_border_sum(&self) -> Size<f64> {
        self.padding_border().sum()
    }
}

/// [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
///
/// Resolve margin, border and padding. Percentages in every direction refer
/// to the containing block's width, "even for 'padding-top' and
/// 'padding-bottom'" ([§ 8.4](https://www.w3.org/TR/CSS2/box.html#padding-properties)).
/// Negative border and padding are clamped to zero; margins may be negative.
#[must_use]
pub fn resolve_box_edges(style: &Style, width_basis: Option<f64>) -> BoxEdges {
    let margin = style
        .margin
        .map(|m| m.resolve_or_zero(width_basis));
    let margin_auto = style.margin.map(Dimension::is_auto);
    let border = style
        .border
        .map(|b| b.resolve_or_zero(width_basis).max(0.0));
    let padding = style
        .padding
        .map(|p| p.resolve_or_zero(width_basis).max(0.0));
    BoxEdges {
        margin,
        margin_auto,
        border,
        padding,
    }
}

/// [§ 3 Box Sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
///
/// Convert a specified size into a border-box size.
///
/// "content-box: width and height properties include only the content.
/// Border and padding are laid out outside."
/// "border-box: The specified width and height determine the border box of
/// the element. The content width and height are calculated by subtracting
/// the border and padding widths of the respective sides."
pub(crate) fn to_border_box(value: f64, box_sizing: BoxSizing, padding_border: f64) -> f64 {
    match box_sizing {
        BoxSizing::ContentBox => value.max(0.0) + padding_border,
        BoxSizing::BorderBox => value.max(padding_border),
    }
}

/// Resolve `width`/`height` to border-box sizes. `None` means `auto`, which
/// includes a percentage of an indefinite basis.
#[must_use]
pub fn resolve_size(
    style: &Style,
    parent_size: Size<Option<f64>>,
    padding_border: Size<f64>,
) -> Size<Option<f64>> {
    resolve_size_property(style, style.size, parent_size, padding_border)
}

/// Resolve `min-width`/`min-height` to border-box sizes.
#[must_use]
pub fn resolve_min_size(
    style: &Style,
    parent_size: Size<Option<f64>>,
    padding_border: Size<f64>,
) -> Size<Option<f64>> {
    resolve_size_property(style, style.min_size, parent_size, padding_border)
}

/// Resolve `max-width`/`max-height` to border-box sizes.
#[must_use]
pub fn resolve_max_size(
    style: &Style,
    parent_size: Size<Option<f64>>,
    padding_border: Size<f64>,
) -> Size<Option<f64>> {
    resolve_size_property(style, style.max_size, parent_size, padding_border)
}

fn resolve_size_property(
    style: &Style,
    property: Size<Dimension>,
    parent_size: Size<Option<f64>>,
    padding_border: Size<f64>,
) -> Size<Option<f64>> {
    Size {
        width: property
            .width
            .resolve(parent_size.width)
            .map(|w| to_border_box(w, style.box_sizing, padding_border.width)),
        height: property
            .height
            .resolve(parent_size.height)
            .map(|h| to_border_box(h, style.box_sizing, padding_border.height)),
    }
}

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// "If the tentative used width is greater than 'max-width', the rules above
/// are applied again using the computed value of 'max-width' as the computed
/// value for 'width'. If the resulting width is smaller than 'min-width',
/// the rules above are applied again using the value of 'min-width'."
///
/// The minimum therefore wins over the maximum.
#[must_use]
pub fn clamp_size(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let capped = max.map_or(value, |m| value.min(m));
    min.map_or(capped, |m| capped.max(m))
}

/// Per-node constraints bundled for the layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedBox {
    /// Margin, border, padding.
    pub edges: BoxEdges,
    /// `width`/`height` as border-box sizes.
    pub size: Size<Option<f64>>,
    /// `min-*` as border-box sizes.
    pub min_size: Size<Option<f64>>,
    /// `max-*` as border-box sizes.
    pub max_size: Size<Option<f64>>,
}

impl ResolvedBox {
    /// Resolve every box property of `style` against the parent's content
    /// box.
    #[must_use]
    pub fn resolve(style: &Style, parent_size: Size<Option<f64>>) -> Self {
        let edges = resolve_box_edges(style, parent_size.width);
        let pb = edges.padding_border_sum();
        let min_size = resolve_min_size(style, parent_size, pb);
        let max_size = resolve_max_size(style, parent_size, pb);
        let size = resolve_size(style, parent_size, pb);
        let clamp = |v: Option<f64>, min: Option<f64>, max: Option<f64>, floor: f64| {
            v.map(|v| clamp_size(v, min, max).max(floor))
        };
        Self {
            edges,
            size: Size {
                width: clamp(size.width, min_size.width, max_size.width, pb.width),
                height: clamp(size.height, min_size.height, max_size.height, pb.height),
            },
            min_size,
            max_size,
        }
    }

    /// Padding plus border per axis.
    #[must_use]
    pub fn padding_border(&self) -> Size<f64> {
        self.edges.padding_border_sum()
    }

    /// Clamp a border-box width by min/max and the padding+border floor.
    #[must_use]
    pub fn clamp_width(&self, width: f64) -> f64 {
        clamp_size(width, self.min_size.width, self.max_size.width)
            .max(self.padding_border().width)
    }

    /// Clamp a border-box height by min/max and the padding+border floor.
    #[must_use]
    pub fn clamp_height(&self, height: f64) -> f64 {
        clamp_size(height, self.min_size.height, self.max_size.height)
            .max(self.padding_border().height)
    }

    /// Clamp both axes.
    #[must_use]
    pub fn clamp(&self, size: Size<f64>) -> Size<f64> {
        Size::new(self.clamp_width(size.width), self.clamp_height(size.height))
    }

    /// Content-box size for a border-box size.
    #[must_use]
    pub fn content_size(&self, border_box: Size<f64>) -> Size<f64> {
        let pb = self.padding_border();
        Size::new(
            (border_box.width - pb.width).max(0.0),
            (border_box.height - pb.height).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_wins_over_max() {
        assert_eq!(clamp_size(500.0, Some(200.0), Some(100.0)), 200.0);
        assert_eq!(clamp_size(50.0, Some(20.0), Some(100.0)), 50.0);
        assert_eq!(clamp_size(150.0, None, Some(100.0)), 100.0);
    }

    #[test]
    fn test_border_box_never_smaller_than_padding_border() {
        assert_eq!(to_border_box(10.0, BoxSizing::BorderBox, 30.0), 30.0);
        assert_eq!(to_border_box(10.0, BoxSizing::ContentBox, 30.0), 40.0);
    }
}
