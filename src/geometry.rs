//! Core geometry types for layout
//!
//! This module provides the geometric primitives used throughout the
//! layout engine. All units are in CSS pixels unless otherwise noted.
//!
//! # Coordinate System
//!
//! The coordinate system has its origin at the top-left corner:
//! - Positive X extends to the right
//! - Positive Y extends downward
//!
//! This matches CSS's coordinate system as defined in CSS 2.1 Section 8.3.1.

use std::fmt;

/// A 2D point in CSS pixel space
///
/// Represents a coordinate in the layout's coordinate system.
/// The origin (0, 0) is at the top-left corner.
///
/// # Examples
///
/// ```
/// use flowlayout::Point;
///
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::ZERO;
///
/// assert_eq!(p1.x, 10.0);
/// assert_eq!(p1.y, 20.0);
/// assert_eq!(p2, Point::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  /// X coordinate (horizontal position, increases to the right)
  pub x: f32,
  /// Y coordinate (vertical position, increases downward)
  pub y: f32,
}

impl Point {
  /// The zero point at the origin (0, 0)
  pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

  /// Creates a new point at the given coordinates
  pub const fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }

  /// Translates this point by another point's coordinates
  ///
  /// # Examples
  ///
  /// ```
  /// use flowlayout::Point;
  ///
  /// let p1 = Point::new(10.0, 20.0);
  /// let p2 = Point::new(5.0, 3.0);
  ///
  /// assert_eq!(p1.translate(p2), Point::new(15.0, 23.0));
  /// ```
  pub fn translate(self, other: Point) -> Self {
    Self {
      x: self.x + other.x,
      y: self.y + other.y,
    }
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A 2D size in CSS pixels
///
/// Represents the dimensions of a rectangular region.
/// Both width and height are non-negative (though not enforced by the type).
///
/// # Examples
///
/// ```
/// use flowlayout::Size;
///
/// let size = Size::new(100.0, 50.0);
/// assert_eq!(size.width, 100.0);
/// assert_eq!(size.height, 50.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
  /// Width (horizontal extent)
  pub width: f32,
  /// Height (vertical extent)
  pub height: f32,
}

impl Size {
  /// A size with zero width and height
  pub const ZERO: Self = Self {
    width: 0.0,
    height: 0.0,
  };

  /// Creates a new size with the given dimensions
  pub const fn new(width: f32, height: f32) -> Self {
    Self { width, height }
  }

  /// Returns true if either dimension is zero or negative
  pub fn is_empty(self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }
}

impl fmt::Display for Size {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{}", self.width, self.height)
  }
}

/// An axis-aligned rectangle in CSS pixel space
///
/// Defined by its top-left corner and its size.
///
/// # Examples
///
/// ```
/// use flowlayout::Rect;
///
/// let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
/// assert_eq!(rect.x, 10.0);
/// assert_eq!(rect.right(), 110.0);
/// assert_eq!(rect.bottom(), 70.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  /// X coordinate of the left edge
  pub x: f32,
  /// Y coordinate of the top edge
  pub y: f32,
  /// Width (horizontal extent)
  pub width: f32,
  /// Height (vertical extent)
  pub height: f32,
}

impl Rect {
  /// A rectangle at the origin with zero size
  pub const ZERO: Self = Self {
    x: 0.0,
    y: 0.0,
    width: 0.0,
    height: 0.0,
  };

  /// Creates a new rectangle from its top-left corner and size
  pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Creates a rectangle from a corner point and a size
  pub const fn from_origin_size(origin: Point, size: Size) -> Self {
    Self {
      x: origin.x,
      y: origin.y,
      width: size.width,
      height: size.height,
    }
  }

  /// X coordinate of the right edge
  pub fn right(self) -> f32 {
    self.x + self.width
  }

  /// Y coordinate of the bottom edge
  pub fn bottom(self) -> f32 {
    self.y + self.height
  }

  /// The top-left corner
  pub fn origin(self) -> Point {
    Point::new(self.x, self.y)
  }

  /// The size of the rectangle
  pub fn size(self) -> Size {
    Size::new(self.width, self.height)
  }

  /// Returns true if either dimension is zero or negative
  pub fn is_empty(self) -> bool {
    self.width <= 0.0 || self.height <= 0.0
  }
}

impl fmt::Display for Rect {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn point_translate() {
    let p = Point::new(1.0, 2.0).translate(Point::new(3.0, -1.0));
    assert_eq!(p, Point::new(4.0, 1.0));
  }

  #[test]
  fn size_is_empty() {
    assert!(Size::ZERO.is_empty());
    assert!(Size::new(0.0, 10.0).is_empty());
    assert!(!Size::new(1.0, 1.0).is_empty());
  }

  #[test]
  fn rect_edges() {
    let r = Rect::new(5.0, 10.0, 20.0, 30.0);
    assert_eq!(r.right(), 25.0);
    assert_eq!(r.bottom(), 40.0);
    assert_eq!(r.origin(), Point::new(5.0, 10.0));
    assert_eq!(r.size(), Size::new(20.0, 30.0));
  }

  #[test]
  fn rect_from_origin_size() {
    let r = Rect::from_origin_size(Point::new(1.0, 2.0), Size::new(3.0, 4.0));
    assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
  }
}
