//! Points, parametric segments and vector paths.
//!
//! A [`VectorPath`] is one drawable contour: an ordered list of segments,
//! each of which can be evaluated at any `t` in `[0, 1]` and reports its own
//! arc length. The sampler only relies on the [`PathSegment`] trait, so
//! loaders are free to supply their own curve types.

mod segments;

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

pub use segments::{CubicBezier, EllipticalArc, LineSegment, QuadraticBezier};

/// A position in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean norm of the point seen as a vector.
    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    /// Linear interpolation towards `other`; `alpha = 0` returns `self`.
    ///
    /// A coordinate shared by both points is returned unchanged for every
    /// `alpha`.
    pub fn lerp(self, other: Point, alpha: f64) -> Point {
        self + (other - self) * alpha
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A parametric curve piece.
pub trait PathSegment: fmt::Debug + Send + Sync {
    /// Position at parameter `t` in `[0, 1]`.
    fn evaluate(&self, t: f64) -> Point;

    /// Length of the curve between `t = 0` and `t = 1`.
    fn arc_length(&self) -> f64;
}

/// An ordered sequence of segments forming one contour.
#[derive(Debug, Default)]
pub struct VectorPath {
    segments: Vec<Box<dyn PathSegment>>,
}

impl VectorPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a path from boxed segments.
    pub fn from_segments(segments: Vec<Box<dyn PathSegment>>) -> Self {
        Self { segments }
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: impl PathSegment + 'static) {
        self.segments.push(Box::new(segment));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, segment: impl PathSegment + 'static) -> Self {
        self.push(segment);
        self
    }

    /// The segments in traversal order.
    pub fn segments(&self) -> &[Box<dyn PathSegment>] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of the segment arc lengths.
    pub fn arc_length(&self) -> f64 {
        self.segments.iter().map(|s| s.arc_length()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);

        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Point::new(-1.0, 0.5);
        let b = Point::new(1.0, -0.5);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_lerp_keeps_shared_coordinates() {
        let a = Point::new(0.0, 4.999_999_999_999_999);
        let b = Point::new(10.0, 4.999_999_999_999_999);
        let c = Point::new(3.0, 4.0);
        for i in 0..=99 {
            let t = i as f64 / 99.0;
            assert_eq!(a.lerp(b, t).y, a.y);
            assert_eq!(c.lerp(c, t), c);
        }
    }

    #[test]
    fn test_path_length_sums_segments() {
        let path = VectorPath::new()
            .with(LineSegment::new(Point::new(0.0, 0.0), Point::new(3.0, 0.0)))
            .with(LineSegment::new(Point::new(3.0, 0.0), Point::new(3.0, 4.0)));

        assert_eq!(path.len(), 2);
        assert!((path.arc_length() - 7.0).abs() < 1e-12);
    }
}
