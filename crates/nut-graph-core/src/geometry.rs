//! Points, sizes and rectangles.
//!
//! All coordinates follow SVG: the origin is the top-left corner and y grows
//! downward.
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Layout reports node *centers*. [`Point::to_bounds`] turns a center and a
//! [`Size`] into the [`Bounds`] used for anchors, frames and hit tests.

/// A position in diagram or screen space.
///
/// # Examples
///
/// ```
/// # use nut_graph_core::geometry::Point;
/// let pivot = Point::new(10.0, 20.0);
/// let moved = pivot.add_point(Point::new(5.0, 5.0));
///
/// assert_eq!(moved, Point::new(15.0, 25.0));
/// assert_eq!(pivot.midpoint(moved), Point::new(12.5, 22.5));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Multiplies both coordinates, as zooming does.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// `false` if either coordinate is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The rectangle of `size` centered on this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        let (half_w, half_h) = (size.width / 2.0, size.height / 2.0);
        Bounds {
            min_x: self.x - half_w,
            min_y: self.y - half_h,
            max_x: self.x + half_w,
            max_y: self.y + half_h,
        }
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Grows the size by the insets on every side.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.left + insets.right,
            self.height + insets.top + insets.bottom,
        )
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned rectangle stored as its two extreme corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// The rectangle spanning `min` to `max`.
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn center(self) -> Point {
        self.min_point().midpoint(Point::new(self.max_x, self.max_y))
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Smallest rectangle covering both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nut_graph_core::geometry::{Bounds, Point};
    /// let ups = Bounds::new(Point::new(0.0, 0.0), Point::new(100.0, 30.0));
    /// let pdu = Bounds::new(Point::new(10.0, 40.0), Point::new(130.0, 120.0));
    ///
    /// let rack = ups.merge(&pdu);
    /// assert_eq!(rack.width(), 130.0);
    /// assert_eq!(rack.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn translate(&self, offset: Point) -> Self {
        Self::new(
            self.min_point().add_point(offset),
            Point::new(self.max_x, self.max_y).add_point(offset),
        )
    }

    /// Grows the rectangle outward by the insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left,
            min_y: self.min_y - insets.top,
            max_x: self.max_x + insets.right,
            max_y: self.max_y + insets.bottom,
        }
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Point) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }

    /// `true` if the interiors overlap. Rectangles that only touch along an
    /// edge do not intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// `true` if the point lies on one of the four sides, within `epsilon`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nut_graph_core::geometry::{Point, Size};
    /// let node = Point::new(50.0, 50.0).to_bounds(Size::new(80.0, 40.0));
    ///
    /// assert!(node.is_on_boundary(Point::new(50.0, 70.0), 1e-3));
    /// assert!(!node.is_on_boundary(Point::new(50.0, 50.0), 1e-3));
    /// ```
    pub fn is_on_boundary(&self, point: Point, epsilon: f32) -> bool {
        let grown = self.add_padding(Insets::uniform(epsilon));
        if !grown.contains(point) {
            return false;
        }
        let near = |a: f32, b: f32| (a - b).abs() <= epsilon;
        near(point.x, self.min_x)
            || near(point.x, self.max_x)
            || near(point.y, self.min_y)
            || near(point.y, self.max_y)
    }
}

/// Padding around a box, one value per side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// The same padding on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}
