//! Geometric primitives for page boundaries.
//!
//! PDF Spec: ISO 32000-1:2008, Section 7.9.5 - Rectangles.

use serde::Serialize;
use std::fmt;

/// A rectangle in default user space.
///
/// Stored with normalised corners: `llx <= urx` and `lly <= ury`, no matter
/// which pair of opposite corners the document wrote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    /// Lower-left x
    pub llx: f64,
    /// Lower-left y
    pub lly: f64,
    /// Upper-right x
    pub urx: f64,
    /// Upper-right y
    pub ury: f64,
}

impl Rectangle {
    /// Create a rectangle from two opposite corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_preflight::geometry::Rectangle;
    ///
    /// let rect = Rectangle::from_corners(612.0, 792.0, 0.0, 0.0);
    /// assert_eq!(rect.llx, 0.0);
    /// assert_eq!(rect.ury, 792.0);
    /// assert_eq!(rect.width(), 612.0);
    /// ```
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Intersection with another rectangle, if they overlap.
    ///
    /// Page boxes are clipped to the media box this way.
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        let llx = self.llx.max(other.llx);
        let lly = self.lly.max(other.lly);
        let urx = self.urx.min(other.urx);
        let ury = self.ury.min(other.ury);
        if llx <= urx && lly <= ury {
            Some(Rectangle { llx, lly, urx, ury })
        } else {
            None
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {} {}]", self.llx, self.lly, self.urx, self.ury)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalises() {
        let rect = Rectangle::from_corners(100.0, 50.0, 0.0, 0.0);
        assert_eq!(rect, Rectangle::from_corners(0.0, 0.0, 100.0, 50.0));
        assert_eq!(rect.width(), 100.0);
        assert_eq!(rect.height(), 50.0);
    }

    #[test]
    fn test_intersect() {
        let a = Rectangle::from_corners(0.0, 0.0, 100.0, 100.0);
        let b = Rectangle::from_corners(50.0, 50.0, 150.0, 150.0);
        assert_eq!(a.intersect(&b), Some(Rectangle::from_corners(50.0, 50.0, 100.0, 100.0)));

        let c = Rectangle::from_corners(200.0, 200.0, 300.0, 300.0);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_display() {
        let rect = Rectangle::from_corners(0.0, 0.0, 612.0, 792.0);
        assert_eq!(rect.to_string(), "[0 0 612 792]");
    }
}
