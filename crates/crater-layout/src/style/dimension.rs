//! Length, track and available-space value types.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! [CSS Box Sizing Level 3](https://www.w3.org/TR/css-sizing-3/)

use serde::Serialize;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths) and
/// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
///
/// A sizing or spacing value as handed over by the style collaborator. Units
/// are already normalized to CSS pixels ("points").
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "kebab-case")]
pub enum Dimension {
    /// An absolute length in CSS pixels.
    Points(f64),
    /// A percentage as written: `50%` is `Percent(50.0)`.
    Percent(f64),
    /// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
    ///
    /// "The keyword 'auto'... allows the user agent to compute the value
    /// based on other properties."
    #[default]
    Auto,
}

impl Dimension {
    /// Zero points.
    pub const ZERO: Self = Self::Points(0.0);

    /// Resolve against a percentage basis.
    ///
    /// `Percent` against an indefinite basis and `Auto` both yield `None`, so
    /// that sizing properties fall back to their automatic behaviour.
    #[must_use]
    pub fn resolve(self, basis: Option<f64>) -> Option<f64> {
        match self {
            Self::Points(px) => Some(px),
            Self::Percent(pct) => basis.map(|b| b * pct / 100.0),
            Self::Auto => None,
        }
    }

    /// Resolve against a percentage basis, treating an indefinite basis and
    /// `Auto` as zero. Used for padding, border and gaps.
    #[must_use]
    pub fn resolve_or_zero(self, basis: Option<f64>) -> f64 {
        match self {
            Self::Points(px) => px,
            Self::Percent(pct) => basis.map_or(0.0, |b| b * pct / 100.0),
            Self::Auto => 0.0,
        }
    }

    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// [§ 7.2 Explicit Track Sizing](https://www.w3.org/TR/css-grid-1/#track-sizing)
///
/// "`<track-size>` = `<track-breadth>` | minmax(...) | fit-content(...)"
///
/// The sizing function of a single grid track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "kebab-case")]
pub enum TrackSizing {
    /// A fixed length in CSS pixels.
    Points(f64),
    /// A percentage of the grid container's inner size in that axis.
    Percent(f64),
    /// [§ 7.2.4 Flexible Lengths](https://www.w3.org/TR/css-grid-1/#fr-unit)
    ///
    /// "A flexible length or `<flex>` is a dimension with the fr unit, which
    /// represents a fraction of the leftover space in the grid container."
    Fr(f64),
    /// "Represents the largest min-content contribution of the grid items
    /// occupying the grid track."
    MinContent,
    /// "Represents the largest max-content contribution of the grid items
    /// occupying the grid track."
    MaxContent,
    /// As a maximum: identical to max-content. As a minimum: the largest
    /// minimum size of the items occupying the track.
    #[default]
    Auto,
}

impl TrackSizing {
    /// The fixed size of this track, if its sizing function is definite
    /// given the container's inner size.
    #[must_use]
    pub fn fixed_size(self, basis: Option<f64>) -> Option<f64> {
        match self {
            Self::Points(px) => Some(px.max(0.0)),
            Self::Percent(pct) => basis.map(|b| (b * pct / 100.0).max(0.0)),
            Self::Fr(_) | Self::MinContent | Self::MaxContent | Self::Auto => None,
        }
    }

    /// The flex factor, for `fr` tracks.
    #[must_use]
    pub const fn flex_factor(self) -> Option<f64> {
        match self {
            Self::Fr(fr) => Some(fr),
            _ => None,
        }
    }
}

/// The sizing constraint passed down during layout.
///
/// [§ 2.1 Intrinsic Sizes](https://www.w3.org/TR/css-sizing-3/#intrinsic-sizes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "kebab-case")]
pub enum AvailableSpace {
    /// A definite amount of space in CSS pixels.
    Definite(f64),
    /// Lay out under a min-content constraint.
    MinContent,
    /// Lay out under a max-content constraint.
    MaxContent,
}

impl Default for AvailableSpace {
    fn default() -> Self {
        Self::MaxContent
    }
}

impl AvailableSpace {
    /// The definite amount, if any.
    #[must_use]
    pub const fn definite(self) -> Option<f64> {
        match self {
            Self::Definite(v) => Some(v),
            Self::MinContent | Self::MaxContent => None,
        }
    }

    /// Whether this is a definite amount of space.
    #[must_use]
    pub const fn is_definite(self) -> bool {
        matches!(self, Self::Definite(_))
    }

    /// Subtract a used amount from a definite space, never going below zero.
    /// Intrinsic constraints pass through unchanged.
    #[must_use]
    pub fn shrink_by(self, used: f64) -> Self {
        match self {
            Self::Definite(v) => Self::Definite((v - used).max(0.0)),
            other => other,
        }
    }

    /// `Definite` when `value` is known, otherwise `fallback`.
    #[must_use]
    pub fn from_option(value: Option<f64>, fallback: Self) -> Self {
        value.map_or(fallback, Self::Definite)
    }
}

/// [§ Clamping Overly Large Grids](https://www.w3.org/TR/css-grid-1/#overlarge-grids)
///
/// "Since memory is limited, UAs may clamp the possible size of the implicit
/// grid to be within a UA-defined limit."
///
/// Line numbers are clamped to `-MAX_GRID_LINE..=MAX_GRID_LINE` and spans
/// to `MAX_GRID_LINE`.
pub const MAX_GRID_LINE: i32 = 1000;

/// Most tracks a single `grid-template-*` list expands to.
pub const MAX_GRID_TRACKS: usize = 1000;

/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// One end of a `grid-row` / `grid-column` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum GridLine {
    /// "The property contributes nothing to the grid item's placement."
    #[default]
    Auto,
    /// A 1-based line number; negative numbers count from the end of the
    /// explicit grid.
    Line(i32),
    /// "Contributes a grid span to the grid item's placement."
    Span(u32),
}

/// [§ 8.4 Placement Shorthands](https://www.w3.org/TR/css-grid-1/#placement-shorthands)
///
/// The start and end line of an item in one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GridPlacement {
    /// The start line.
    pub start: GridLine,
    /// The end line.
    pub end: GridLine,
}
