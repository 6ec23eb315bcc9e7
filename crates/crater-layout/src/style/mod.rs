//! The computed style a layout node carries.
//!
//! Every value here is already resolved by the style collaborator except
//! percentages and `auto`, which depend on the containing block and are
//! resolved during layout.
//!
//! [CSS Display Level 3](https://www.w3.org/TR/css-display-3/)
//! [CSS Flexible Box Layout Level 1](https://www.w3.org/TR/css-flexbox-1/)
//! [CSS Grid Layout Level 1](https://www.w3.org/TR/css-grid-1/)
//! [CSS Box Alignment Level 3](https://www.w3.org/TR/css-align-3/)

mod color;
mod dimension;
pub mod parse;

pub use color::Color;
pub use dimension::{
    AvailableSpace, Dimension, GridLine, GridPlacement, MAX_GRID_LINE, MAX_GRID_TRACKS, TrackSizing,
};

use serde::Serialize;

use crate::geometry::{Edges, Size};

/// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// Only the inner display types this engine implements. Text leaves and
/// elements without children are laid out as block leaves.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Display {
    /// "The element lays out its contents using flow layout."
    #[default]
    #[strum(to_string = "block", serialize = "flow", serialize = "flow-root")]
    Block,
    /// "The element lays out its contents using flex layout."
    Flex,
    /// "The element lays out its contents using grid layout."
    Grid,
    /// "The element and its descendants generate no boxes."
    None,
}

/// [§ 3 Box Sizing](https://www.w3.org/TR/css-sizing-3/#box-sizing)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BoxSizing {
    /// "width and height properties (and respectively on the min/max
    /// properties) include only the content."
    #[default]
    ContentBox,
    /// "The specified width and height (and respective min/max properties)
    /// on this element determine the border box of the element."
    BorderBox,
}

/// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
///
/// Yoga's `positionType`. `static` is read as `relative` with no insets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Position {
    /// "The box's position is calculated according to the normal flow. Then
    /// the box is offset relative to its normal position."
    #[default]
    #[strum(to_string = "relative", serialize = "static")]
    Relative,
    /// "The box's position (and possibly size) is specified with the 'top',
    /// 'right', 'bottom', and 'left' properties."
    Absolute,
}

/// [§ 3 Scrolling and Clipping Overflow](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
///
/// Layout only cares whether the value is `visible`: it decides the
/// automatic minimum size of flex items.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Overflow {
    /// Content is not clipped.
    #[default]
    Visible,
    /// Content is clipped with no scrolling mechanism.
    #[strum(to_string = "hidden", serialize = "clip")]
    Hidden,
    /// Content is clipped and scrollable.
    #[strum(to_string = "scroll", serialize = "auto")]
    Scroll,
}

/// [§ 5.1 'flex-direction'](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexDirection {
    /// "The flex container's main axis has the same orientation as the
    /// inline axis of the current writing mode."
    #[default]
    Row,
    /// "Same as row, except the main-start and main-end directions are
    /// swapped."
    RowReverse,
    /// "The flex container's main axis has the same orientation as the block
    /// axis of the current writing mode."
    Column,
    /// "Same as column, except the main-start and main-end directions are
    /// swapped."
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether main-start and main-end are swapped.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// [§ 5.2 'flex-wrap'](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexWrap {
    /// "The flex container is single-line."
    #[default]
    #[serde(rename = "nowrap")]
    #[strum(to_string = "nowrap")]
    NoWrap,
    /// "The flex container is multi-line."
    Wrap,
    /// "Same as wrap, except the cross-start and cross-end directions are
    /// swapped."
    WrapReverse,
}

/// [§ 8.2 'justify-content'](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
/// and [§ 5.1 'justify-content' / 'align-content'](https://www.w3.org/TR/css-align-3/#align-justify-content)
///
/// Shared by `justify-content` on flex and grid containers and by
/// `align-content`. `Normal` behaves as `flex-start` in flex layout and as
/// `stretch` in grid layout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum JustifyContent {
    /// The initial value.
    #[default]
    Normal,
    /// "Flex items are packed toward the start of the line."
    #[strum(to_string = "flex-start", serialize = "start", serialize = "left")]
    FlexStart,
    /// "Flex items are packed toward the end of the line."
    #[strum(to_string = "flex-end", serialize = "end", serialize = "right")]
    FlexEnd,
    /// "Flex items are packed toward the center of the line."
    Center,
    /// "Flex items are evenly distributed in the line."
    SpaceBetween,
    /// "Flex items are evenly distributed in the line, with half-size spaces
    /// on either end."
    SpaceAround,
    /// "The alignment subjects are evenly distributed in the alignment
    /// container, with a full-size space on either end."
    SpaceEvenly,
    /// "If the combined size of the alignment subjects is less than the size
    /// of the alignment container, any auto-sized alignment subjects have
    /// their size increased equally."
    Stretch,
}

/// Alias used for `align-content`, which accepts the same keywords.
pub type AlignContent = JustifyContent;

/// [§ 8.3 'align-items' / 'align-self'](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
///
/// Also used for grid `justify-items` / `justify-self`, where `baseline`
/// falls back to `start`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignItems {
    /// "The cross-start margin edge of the flex item is placed flush with
    /// the cross-start edge of the line."
    #[strum(
        to_string = "flex-start",
        serialize = "start",
        serialize = "self-start",
        serialize = "left"
    )]
    FlexStart,
    /// "The cross-end margin edge of the flex item is placed flush with the
    /// cross-end edge of the line."
    #[strum(
        to_string = "flex-end",
        serialize = "end",
        serialize = "self-end",
        serialize = "right"
    )]
    FlexEnd,
    /// "The flex item's margin box is centered in the cross axis within the
    /// line."
    Center,
    /// "The flex item participates in baseline alignment."
    Baseline,
    /// "If the cross size property of the flex item computes to auto, and
    /// neither of the cross-axis margins are auto, the flex item is
    /// stretched."
    #[default]
    #[strum(to_string = "stretch", serialize = "normal")]
    Stretch,
}

/// [§ 7.7 'grid-auto-flow'](https://www.w3.org/TR/css-grid-1/#grid-auto-flow-property)
///
/// "Controls how the auto-placement algorithm works."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
pub enum GridAutoFlow {
    /// "The auto-placement algorithm places items by filling each row in
    /// turn, adding new rows as necessary."
    #[default]
    #[strum(to_string = "row")]
    Row,
    /// "The auto-placement algorithm places items by filling each column in
    /// turn, adding new columns as necessary."
    #[strum(to_string = "column")]
    Column,
    /// `row dense`
    #[strum(to_string = "row dense")]
    RowDense,
    /// `column dense`
    #[strum(to_string = "column dense")]
    ColumnDense,
}

impl GridAutoFlow {
    /// Whether auto-placement fills rows first.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowDense)
    }

    /// "If specified, the auto-placement algorithm uses a 'dense' packing
    /// algorithm, which attempts to fill in holes earlier in the grid."
    #[must_use]
    pub const fn is_dense(self) -> bool {
        matches!(self, Self::RowDense | Self::ColumnDense)
    }
}

/// The style of one layout node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// `display`
    pub display: Display,
    /// `box-sizing`
    pub box_sizing: BoxSizing,
    /// `position`
    pub position: Position,
    /// `top` / `right` / `bottom` / `left`
    pub inset: Edges<Dimension>,
    /// `overflow`
    pub overflow: Overflow,

    /// `width` / `height`
    pub size: Size<Dimension>,
    /// `min-width` / `min-height`
    pub min_size: Size<Dimension>,
    /// `max-width` / `max-height`
    pub max_size: Size<Dimension>,

    /// `margin-*`
    pub margin: Edges<Dimension>,
    /// `padding-*`
    pub padding: Edges<Dimension>,
    /// `border-*-width`
    pub border: Edges<Dimension>,

    /// `flex-direction`
    pub flex_direction: FlexDirection,
    /// `flex-wrap`
    pub flex_wrap: FlexWrap,
    /// `flex-grow`
    pub flex_grow: f64,
    /// `flex-shrink`
    pub flex_shrink: f64,
    /// `flex-basis`
    pub flex_basis: Dimension,
    /// `order`
    pub order: i32,

    /// `justify-content`
    pub justify_content: JustifyContent,
    /// `align-items`
    pub align_items: AlignItems,
    /// `align-self`; `None` is `auto` (inherit the parent's `align-items`).
    pub align_self: Option<AlignItems>,
    /// `align-content`
    pub align_content: AlignContent,
    /// `justify-items` (grid only)
    pub justify_items: AlignItems,
    /// `justify-self` (grid only); `None` is `auto`.
    pub justify_self: Option<AlignItems>,

    /// `grid-template-columns`
    pub grid_template_columns: Vec<TrackSizing>,
    /// `grid-template-rows`
    pub grid_template_rows: Vec<TrackSizing>,
    /// `grid-auto-columns`
    pub grid_auto_columns: TrackSizing,
    /// `grid-auto-rows`
    pub grid_auto_rows: TrackSizing,
    /// `grid-auto-flow`
    pub grid_auto_flow: GridAutoFlow,
    /// `grid-column-start` / `grid-column-end`
    pub grid_column: GridPlacement,
    /// `grid-row-start` / `grid-row-end`
    pub grid_row: GridPlacement,
    /// `column-gap` (width) and `row-gap` (height)
    pub gap: Size<Dimension>,

    /// `background-color`
    pub background_color: Option<Color>,
    /// `color`
    pub color: Option<Color>,
    /// `opacity`
    pub opacity: f64,
    /// `font-size` in CSS pixels, used to measure text leaves.
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            display: Display::Block,
            box_sizing: BoxSizing::ContentBox,
            position: Position::Relative,
            inset: Edges::all(Dimension::Auto),
            overflow: Overflow::Visible,
            size: Size::splat(Dimension::Auto),
            min_size: Size::splat(Dimension::Auto),
            max_size: Size::splat(Dimension::Auto),
            margin: Edges::all(Dimension::ZERO),
            padding: Edges::all(Dimension::ZERO),
            border: Edges::all(Dimension::ZERO),
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Dimension::Auto,
            order: 0,
            justify_content: JustifyContent::Normal,
            align_items: AlignItems::Stretch,
            align_self: None,
            align_content: JustifyContent::Normal,
            justify_items: AlignItems::Stretch,
            justify_self: None,
            grid_template_columns: Vec::new(),
            grid_template_rows: Vec::new(),
            grid_auto_columns: TrackSizing::Auto,
            grid_auto_rows: TrackSizing::Auto,
            grid_auto_flow: GridAutoFlow::Row,
            grid_column: GridPlacement::default(),
            grid_row: GridPlacement::default(),
            gap: Size::splat(Dimension::ZERO),
            background_color: None,
            color: None,
            opacity: 1.0,
            font_size: 16.0,
        }
    }
}

impl Style {
    /// Whether this node is taken out of flow.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        matches!(self.position, Position::Absolute)
    }

    /// Whether this node generates no box at all.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.display, Display::None)
    }

    /// Parse a CSS declaration block into a fresh style.
    ///
    /// See [`parse::apply_declarations`].
    #[must_use]
    pub fn from_css(css: &str) -> Self {
        let mut style = Self::default();
        parse::apply_declarations(&mut style, css);
        style
    }
}
