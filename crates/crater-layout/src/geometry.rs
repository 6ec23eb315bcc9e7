//! Small geometric value types shared by every layout algorithm.

use std::ops::Add;

use serde::Serialize;

/// Tolerance used when comparing accumulated floating-point sizes.
pub const EPSILON: f64 = 1e-6;

/// A width/height pair.
///
/// Flex layout reads it through [`Size::main`] and [`Size::cross`] so that
/// the same code serves rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Size<T> {
    /// Horizontal extent.
    pub width: T,
    /// Vertical extent.
    pub height: T,
}

impl<T: Copy> Size<T> {
    /// Construct from both extents.
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    /// The same value in both axes.
    pub const fn splat(value: T) -> Self {
        Self {
            width: value,
            height: value,
        }
    }

    /// The main-axis component: width for rows, height for columns.
    #[must_use]
    pub const fn main(self, is_row: bool) -> T {
        if is_row { self.width } else { self.height }
    }

    /// The cross-axis component.
    #[must_use]
    pub const fn cross(self, is_row: bool) -> T {
        if is_row { self.height } else { self.width }
    }

    /// Build a size from main/cross components.
    #[must_use]
    pub const fn from_main_cross(is_row: bool, main: T, cross: T) -> Self {
        if is_row {
            Self::new(main, cross)
        } else {
            Self::new(cross, main)
        }
    }

    /// Apply `f` to both components.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Size<U> {
        Size {
            width: f(self.width),
            height: f(self.height),
        }
    }

    /// Combine two sizes component-wise.
    pub fn zip_map<U: Copy, V>(self, other: Size<U>, mut f: impl FnMut(T, U) -> V) -> Size<V> {
        Size {
            width: f(self.width, other.width),
            height: f(self.height, other.height),
        }
    }
}

impl Size<f64> {
    /// The empty size.
    pub const ZERO: Self = Self::new(0.0, 0.0);
}

impl<T: Add<Output = T>> Add for Size<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl<T: Copy> Size<Option<T>> {
    /// Fill in missing components from `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            width: self.width.or(other.width),
            height: self.height.or(other.height),
        }
    }
}

/// Four-sided values: margin, border, padding or insets.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Edges<T> {
    /// Top edge.
    pub top: T,
    /// Right edge.
    pub right: T,
    /// Bottom edge.
    pub bottom: T,
    /// Left edge.
    pub left: T,
}

impl<T: Copy> Edges<T> {
    /// The same value on every side.
    pub const fn all(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Apply `f` to each side.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Edges<U> {
        Edges {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }

    /// The main-start side: left for rows, top for columns.
    #[must_use]
    pub const fn main_start(self, is_row: bool) -> T {
        if is_row { self.left } else { self.top }
    }

    /// The main-end side.
    #[must_use]
    pub const fn main_end(self, is_row: bool) -> T {
        if is_row { self.right } else { self.bottom }
    }

    /// The cross-start side.
    #[must_use]
    pub const fn cross_start(self, is_row: bool) -> T {
        if is_row { self.top } else { self.left }
    }

    /// The cross-end side.
    #[must_use]
    pub const fn cross_end(self, is_row: bool) -> T {
        if is_row { self.bottom } else { self.right }
    }
}

impl Edges<f64> {
    /// No edges.
    pub const ZERO: Self = Self::all(0.0);

    /// `left + right`
    #[must_use]
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    /// `top + bottom`
    #[must_use]
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    /// Sum in both axes.
    #[must_use]
    pub fn sum(self) -> Size<f64> {
        Size::new(self.horizontal(), self.vertical())
    }

    /// Sum along the main axis.
    #[must_use]
    pub fn main_sum(self, is_row: bool) -> f64 {
        if is_row {
            self.horizontal()
        } else {
            self.vertical()
        }
    }

    /// Sum along the cross axis.
    #[must_use]
    pub fn cross_sum(self, is_row: bool) -> f64 {
        if is_row {
            self.vertical()
        } else {
            self.horizontal()
        }
    }
}

impl Add for Edges<f64> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

/// A rectangle positioned in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f64,
    /// Vertical position of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rect {
    /// Whether `other` lies inside this rectangle, within `epsilon`.
    #[must_use]
    pub fn contains(&self, other: &Self, epsilon: f64) -> bool {
        other.x >= self.x - epsilon
            && other.y >= self.y - epsilon
            && other.x + other.width <= self.x + self.width + epsilon
            && other.y + other.height <= self.y + self.height + epsilon
    }
}
