//! Style model, box model, block/flex/grid layout and incremental caching
//! for the Crater layout engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style model** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Lengths, percentages, `auto`, track sizes with `fr`/`min-content`/`max-content`
//!   - A best-effort inline declaration parser (`style="…"` text)
//!
//! - **Layout tree**
//!   - Generational arena of nodes addressed by [`NodeId`]
//!   - Dirty propagation to ancestors on every mutation
//!
//! - **Box model** ([CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/))
//!   - `box-sizing`, min/max clamping, percentage resolution
//!
//! - **Formatting contexts**
//!   - Block flow with sibling margin collapsing ([CSS 2.1 § 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting))
//!   - Flexbox ([CSS Flexible Box Layout Level 1](https://www.w3.org/TR/css-flexbox-1/))
//!   - Grid ([CSS Grid Layout Level 1](https://www.w3.org/TR/css-grid-1/))
//!   - Relative and absolute positioning
//!
//! - **Incremental layout**
//!   - Per-node layout and measurement cache slots keyed by input constraints
//!   - Hit/miss statistics per pass
//!
//! # Not Yet Implemented
//!
//! - Inline formatting contexts (text leaves are atomic boxes)
//! - Named grid lines and areas
//! - Writing modes other than `horizontal-tb`

/// Block flow layout per [CSS 2.1 § 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting).
pub mod block;
/// Box model resolution per [CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/).
pub mod box_model;
/// Per-node layout cache and pass statistics.
pub mod cache;
/// Layout pass orchestration and dispatch by display type.
pub mod compute;
/// Engine configuration.
pub mod config;
/// Engine error type.
pub mod error;
/// Flex layout per [CSS Flexible Box Layout Level 1](https://www.w3.org/TR/css-flexbox-1/).
pub mod flex;
/// Size, edge and rectangle value types.
pub mod geometry;
/// Grid layout per [CSS Grid Layout Level 1](https://www.w3.org/TR/css-grid-1/).
pub mod grid;
/// Layout and paint tree snapshots.
pub mod output;
/// Relative and absolute positioning per [CSS 2.1 § 9.3](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme).
pub mod positioned;
/// Computed style and the inline declaration parser.
pub mod style;
/// Text leaf measurement.
pub mod text;
/// The node arena.
pub mod tree;

pub use box_model::LayoutResult;
pub use cache::CacheStats;
pub use compute::{LayoutInput, LayoutOutput, RunMode};
pub use config::{FontMetricsKind, LayoutConfig};
pub use error::LayoutError;
pub use geometry::{Edges, Rect, Size};
pub use output::{LayoutSnapshot, PaintSnapshot};
pub use style::{
    AlignItems, AvailableSpace, BoxSizing, Color, Dimension, Display, FlexDirection, FlexWrap,
    GridAutoFlow, GridLine, GridPlacement, JustifyContent, MAX_GRID_LINE, MAX_GRID_TRACKS,
    Overflow, Position, Style, TrackSizing,
};
pub use text::{ApproximateFontMetrics, FontMetrics, MonospaceFontMetrics};
pub use tree::{LayoutTree, NodeId, Node};
