//! Text leaf measurement.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! Crater does not run an inline formatting context. A text node is an
//! atomic leaf whose intrinsic sizes come from its words: the min-content
//! width is the widest word, the max-content width is the whole run on one
//! line, and the height is the number of greedily wrapped lines times the
//! line height.

use crate::box_model::ResolvedBox;
use crate::compute::{LayoutInput, LayoutOutput};
use crate::geometry::{EPSILON, Size};
use crate::style::{AvailableSpace, Style};

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
pub trait FontMetrics: Send + Sync {
    /// Measure the total advance width of a text string at the given font size.
    fn text_width(&self, text: &str, font_size: f64) -> f64;

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font_size: f64) -> f64;

    /// Height above the baseline.
    fn ascent(&self, font_size: f64) -> f64 {
        font_size * 0.8
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Without access to font data, the average advance of Latin glyphs in a
/// proportional font is taken as 0.6× the font size and `line-height:
/// normal` as 1.2×.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        const CHAR_WIDTH_RATIO: f64 = 0.6;
        text.chars().count() as f64 * font_size * CHAR_WIDTH_RATIO
    }

    fn line_height(&self, font_size: f64) -> f64 {
        const LINE_HEIGHT_RATIO: f64 = 1.2;
        font_size * LINE_HEIGHT_RATIO
    }
}

/// Character-cell metrics for terminal renderers: every character is half
/// an em wide and a line is exactly one em.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceFontMetrics;

impl FontMetrics for MonospaceFontMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * 0.5
    }

    fn line_height(&self, font_size: f64) -> f64 {
        font_size
    }
}

/// Intrinsic widths of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    /// Width of the widest unbreakable word.
    pub min_content: f64,
    /// Width of the whole run on a single line.
    pub max_content: f64,
}

/// [§ 4.1.1 Phase I: Collapsing and Transformation](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
///
/// Measure a run with collapsed white space.
#[must_use]
pub fn measure_text(metrics: &dyn FontMetrics, text: &str, font_size: f64) -> TextExtents {
    let space = metrics.text_width(" ", font_size);
    let mut extents = TextExtents::default();
    for (i, word) in text.split_whitespace().enumerate() {
        let w = metrics.text_width(word, font_size);
        extents.min_content = extents.min_content.max(w);
        extents.max_content += if i == 0 { w } else { space + w };
    }
    extents
}

/// [§ 5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
///
/// Greedily pack words into lines no wider than `width`. A word wider than
/// the line sits on its own line and overflows. Returns 0 for blank text.
#[must_use]
pub fn count_lines(metrics: &dyn FontMetrics, text: &str, font_size: f64, width: f64) -> usize {
    let space = metrics.text_width(" ", font_size);
    let mut lines = 0;
    let mut current = 0.0;
    for word in text.split_whitespace() {
        let w = metrics.text_width(word, font_size);
        if lines == 0 {
            lines = 1;
            current = w;
        } else if current + space + w <= width + EPSILON {
            current += space + w;
        } else {
            lines += 1;
            current = w;
        }
    }
    lines
}

/// Lay out a text leaf.
///
/// The width is shrink-to-fit: `min(max(min-content, available),
/// max-content)` unless the parent or the style fixes it. The height follows
/// from wrapping at the resulting content width.
pub(crate) fn compute_text_leaf(
    metrics: &dyn FontMetrics,
    text: &str,
    style: &Style,
    input: LayoutInput,
) -> LayoutOutput {
    let resolved = ResolvedBox::resolve(style, input.parent_size);
    let pb = resolved.padding_border();
    let margin = resolved.edges.margin;
    let font_size = style.font_size.max(0.0);
    let extents = measure_text(metrics, text, font_size);

    let width = input
        .known_dimensions
        .width
        .or(resolved.size.width)
        .unwrap_or_else(|| {
            let content = match input.available_space.width {
                AvailableSpace::Definite(avail) => {
                    let avail = (avail - margin.horizontal() - pb.width).max(0.0);
                    extents.max_content.min(avail.max(extents.min_content))
                }
                AvailableSpace::MinContent => extents.min_content,
                AvailableSpace::MaxContent => extents.max_content,
            };
            resolved.clamp_width(content + pb.width)
        });
    let content_width = (width - pb.width).max(0.0);

    let line_height = metrics.line_height(font_size);
    let lines = count_lines(metrics, text, font_size, content_width);
    let text_height = lines as f64 * line_height;
    let height = input
        .known_dimensions
        .height
        .or(resolved.size.height)
        .unwrap_or_else(|| resolved.clamp_height(text_height + pb.height));

    let padding_border = resolved.edges.padding_border();
    let half_leading = (line_height - font_size) / 2.0;
    LayoutOutput {
        size: Size::new(width, height),
        content_size: Size::new(content_width, text_height),
        first_baseline: (lines > 0)
            .then(|| padding_border.top + half_leading + metrics.ascent(font_size)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents_collapse_whitespace() {
        let m = ApproximateFontMetrics;
        let e = measure_text(&m, "  hello   big\nworld ", 10.0);
        // "hello big world" is 15 chars at 6px.
        assert_eq!(e.max_content, 90.0);
        assert_eq!(e.min_content, 30.0);
    }

    #[test]
    fn test_count_lines_wraps_greedily() {
        let m = ApproximateFontMetrics;
        // Words are 30px, a space is 6px.
        assert_eq!(count_lines(&m, "hello there world", 10.0, 1000.0), 1);
        assert_eq!(count_lines(&m, "hello there world", 10.0, 66.0), 2);
        assert_eq!(count_lines(&m, "hello there world", 10.0, 10.0), 3);
        assert_eq!(count_lines(&m, "   ", 10.0, 10.0), 0);
    }

    #[test]
    fn test_count_lines_tolerates_rounding_at_the_edge() {
        let m = ApproximateFontMetrics;
        // "hello there" is exactly 66px; a width a hair short still fits.
        assert_eq!(count_lines(&m, "hello there", 10.0, 66.0 - EPSILON / 2.0), 1);
        assert_eq!(count_lines(&m, "hello there", 10.0, 66.0 - 2.0 * EPSILON), 2);
    }
}
