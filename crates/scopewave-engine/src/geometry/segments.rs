//! Concrete segment types: lines, Bézier curves and elliptical arcs.

use std::f64::consts::TAU;

use super::{PathSegment, Point};

/// Number of chords used to measure curved segments.
const ARC_TABLE_SAMPLES: usize = 64;

/// Radii or chord lengths below this are treated as zero.
const LENGTH_EPSILON: f64 = 1e-9;

/// Measures a curve by summing `ARC_TABLE_SAMPLES` chords.
fn chord_length(curve: impl Fn(f64) -> Point) -> f64 {
    let mut total = 0.0;
    let mut prev = curve(0.0);
    for i in 1..=ARC_TABLE_SAMPLES {
        let point = curve(i as f64 / ARC_TABLE_SAMPLES as f64);
        total += point.distance(prev);
        prev = point;
    }
    total
}

/// Straight line between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl LineSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

impl PathSegment for LineSegment {
    fn evaluate(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    fn arc_length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// Quadratic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Point,
    pub ctrl: Point,
    pub end: Point,
    length: f64,
}

impl QuadraticBezier {
    pub fn new(start: Point, ctrl: Point, end: Point) -> Self {
        let length = chord_length(|t| quadratic_point(start, ctrl, end, t));
        Self {
            start,
            ctrl,
            end,
            length,
        }
    }
}

// De Casteljau, so collinear control points stay exactly on their line.
fn quadratic_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    p0.lerp(p1, t).lerp(p1.lerp(p2, t), t)
}

impl PathSegment for QuadraticBezier {
    fn evaluate(&self, t: f64) -> Point {
        quadratic_point(self.start, self.ctrl, self.end, t)
    }

    fn arc_length(&self) -> f64 {
        self.length
    }
}

/// Cubic Bézier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
    length: f64,
}

impl CubicBezier {
    pub fn new(start: Point, ctrl1: Point, ctrl2: Point, end: Point) -> Self {
        let length = chord_length(|t| cubic_point(start, ctrl1, ctrl2, end, t));
        Self {
            start,
            ctrl1,
            ctrl2,
            end,
            length,
        }
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    quadratic_point(p0.lerp(p1, t), p1.lerp(p2, t), p2.lerp(p3, t), t)
}

impl PathSegment for CubicBezier {
    fn evaluate(&self, t: f64) -> Point {
        cubic_point(self.start, self.ctrl1, self.ctrl2, self.end, t)
    }

    fn arc_length(&self) -> f64 {
        self.length
    }
}

/// Elliptical arc in center parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalArc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse's x axis, in radians.
    pub rotation: f64,
    pub theta_start: f64,
    pub theta_delta: f64,
    length: f64,
}

impl EllipticalArc {
    /// Creates an arc from its center form.
    pub fn new(
        center: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
        theta_start: f64,
        theta_delta: f64,
    ) -> Self {
        let mut arc = Self {
            center,
            rx,
            ry,
            rotation,
            theta_start,
            theta_delta,
            length: 0.0,
        };
        arc.length = chord_length(|t| arc.evaluate(t));
        arc
    }

    /// Converts SVG endpoint arc parameters to center form.
    ///
    /// Returns `None` when the arc collapses to a straight line (a zero
    /// radius) or to nothing (coincident endpoints); callers substitute a
    /// line or skip the segment. Radii too small to span the endpoints are
    /// scaled up as SVG requires.
    pub fn from_endpoints(
        start: Point,
        end: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
    ) -> Option<Self> {
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx <= LENGTH_EPSILON || ry <= LENGTH_EPSILON || start.distance(end) <= LENGTH_EPSILON {
            return None;
        }

        let phi = x_axis_rotation_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let dx = (start.x - end.x) / 2.0;
        let dy = (start.y - end.y) / 2.0;
        let x1p = cos_phi * dx + sin_phi * dy;
        let y1p = -sin_phi * dx + cos_phi * dy;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rx_sq = rx * rx;
        let ry_sq = ry * ry;
        let denom = rx_sq * y1p * y1p + ry_sq * x1p * x1p;
        if denom.abs() <= LENGTH_EPSILON {
            return None;
        }
        let numerator = rx_sq * ry_sq - rx_sq * y1p * y1p - ry_sq * x1p * x1p;
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coef = sign * (numerator / denom).max(0.0).sqrt();

        let cxp = coef * (rx * y1p / ry);
        let cyp = coef * (-ry * x1p / rx);
        let center = Point::new(
            cos_phi * cxp - sin_phi * cyp + (start.x + end.x) / 2.0,
            sin_phi * cxp + cos_phi * cyp + (start.y + end.y) / 2.0,
        );

        let v1 = Point::new((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v2 = Point::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let theta_start = v1.y.atan2(v1.x);
        let mut theta_delta = (v1.x * v2.y - v1.y * v2.x).atan2(v1.x * v2.x + v1.y * v2.y);
        if !sweep && theta_delta > 0.0 {
            theta_delta -= TAU;
        } else if sweep && theta_delta < 0.0 {
            theta_delta += TAU;
        }

        Some(Self::new(center, rx, ry, phi, theta_start, theta_delta))
    }
}

impl PathSegment for EllipticalArc {
    fn evaluate(&self, t: f64) -> Point {
        let theta = self.theta_start + self.theta_delta * t;
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_phi, cos_phi) = self.rotation.sin_cos();
        let x = self.rx * cos_t;
        let y = self.ry * sin_t;
        Point::new(
            self.center.x + cos_phi * x - sin_phi * y,
            self.center.y + sin_phi * x + cos_phi * y,
        )
    }

    fn arc_length(&self) -> f64 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance(b) < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_line_evaluate_and_length() {
        let line = LineSegment::new(Point::new(0.0, 0.0), Point::new(6.0, 8.0));
        assert_eq!(line.arc_length(), 10.0);
        assert_close(line.evaluate(0.5), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_bezier_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let p3 = Point::new(10.0, 0.0);
        let cubic = CubicBezier::new(p0, Point::new(0.0, 5.0), Point::new(10.0, 5.0), p3);
        assert_close(cubic.evaluate(0.0), p0);
        assert_close(cubic.evaluate(1.0), p3);

        let quad = QuadraticBezier::new(p0, Point::new(5.0, 5.0), p3);
        assert_close(quad.evaluate(0.0), p0);
        assert_close(quad.evaluate(1.0), p3);
        assert_close(quad.evaluate(0.5), Point::new(5.0, 2.5));
    }

    #[test]
    fn test_straight_cubic_length_matches_chord() {
        let cubic = CubicBezier::new(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        );
        assert!((cubic.arc_length() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_curves_keep_their_height() {
        let y = 0.1 + 0.2;
        let cubic = CubicBezier::new(
            Point::new(0.0, y),
            Point::new(3.3, y),
            Point::new(7.1, y),
            Point::new(10.0, y),
        );
        let quad = QuadraticBezier::new(Point::new(0.0, y), Point::new(4.7, y), Point::new(10.0, y));
        let line = LineSegment::new(Point::new(0.0, y), Point::new(10.0, y));
        for i in 0..=97 {
            let t = i as f64 / 97.0;
            assert_eq!(cubic.evaluate(t).y, y);
            assert_eq!(quad.evaluate(t).y, y);
            assert_eq!(line.evaluate(t).y, y);
        }
    }

    #[test]
    fn test_semicircle_arc() {
        let arc = EllipticalArc::from_endpoints(
            Point::new(-1.0, 0.0),
            Point::new(1.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
        )
        .unwrap();

        assert_close(arc.center, Point::new(0.0, 0.0));
        assert_close(arc.evaluate(0.0), Point::new(-1.0, 0.0));
        assert_close(arc.evaluate(1.0), Point::new(1.0, 0.0));
        assert!((arc.arc_length() - PI).abs() < 1e-3);
    }

    #[test]
    fn test_undersized_radii_are_scaled() {
        let arc = EllipticalArc::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            0.5,
            0.5,
            0.0,
            false,
            false,
        )
        .unwrap();
        assert!((arc.rx - 2.0).abs() < 1e-9);
        assert_close(arc.evaluate(1.0), Point::new(4.0, 0.0));
    }

    #[test]
    fn test_zero_radius_arc_is_rejected() {
        let arc = EllipticalArc::from_endpoints(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            0.0,
            1.0,
            0.0,
            false,
            false,
        );
        assert!(arc.is_none());
    }
}
