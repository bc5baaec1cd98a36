//! SVG path data to contours.
//!
//! Only `<path d="...">` geometry is read; transforms, styles and other
//! shape elements are ignored. Each subpath (a `M` or a `Z`) becomes its
//! own [`VectorPath`].

use std::sync::OnceLock;

use regex::Regex;
use svgtypes::PathParser;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::geometry::{
    CubicBezier, EllipticalArc, LineSegment, Point, QuadraticBezier, VectorPath,
};

const PATH_D_PATTERN: &str = r#"(?is)<path\b[^>]*?\sd\s*=\s*(?:"([^"]*)"|'([^']*)')"#;

/// `d` attribute matcher, compiled on first use.
fn path_d_regex() -> EngineResult<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(PATH_D_PATTERN))
        .as_ref()
        .map_err(|err| EngineError::svg(err.to_string()))
}

/// Control point of the previous command, for `S` and `T` reflection.
#[derive(Debug, Clone, Copy)]
enum LastControl {
    None,
    Cubic(Point),
    Quadratic(Point),
}

struct ContourBuilder {
    contours: Vec<VectorPath>,
    current: VectorPath,
    pos: Point,
    start: Point,
    last_control: LastControl,
}

impl ContourBuilder {
    fn new() -> Self {
        Self {
            contours: Vec::new(),
            current: VectorPath::new(),
            pos: Point::default(),
            start: Point::default(),
            last_control: LastControl::None,
        }
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Point {
        if abs {
            Point::new(x, y)
        } else {
            Point::new(self.pos.x + x, self.pos.y + y)
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.contours.push(std::mem::take(&mut self.current));
        }
    }

    fn move_to(&mut self, to: Point) {
        self.flush();
        self.pos = to;
        self.start = to;
        self.last_control = LastControl::None;
    }

    fn line_to(&mut self, to: Point) {
        self.current.push(LineSegment::new(self.pos, to));
        self.pos = to;
        self.last_control = LastControl::None;
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.current.push(CubicBezier::new(self.pos, ctrl1, ctrl2, to));
        self.pos = to;
        self.last_control = LastControl::Cubic(ctrl2);
    }

    fn quadratic_to(&mut self, ctrl: Point, to: Point) {
        self.current.push(QuadraticBezier::new(self.pos, ctrl, to));
        self.pos = to;
        self.last_control = LastControl::Quadratic(ctrl);
    }

    /// First control point of a smooth cubic.
    fn reflected_cubic(&self) -> Point {
        match self.last_control {
            LastControl::Cubic(ctrl) => self.pos * 2.0 - ctrl,
            _ => self.pos,
        }
    }

    /// Control point of a smooth quadratic.
    fn reflected_quadratic(&self) -> Point {
        match self.last_control {
            LastControl::Quadratic(ctrl) => self.pos * 2.0 - ctrl,
            _ => self.pos,
        }
    }

    fn arc_to(
        &mut self,
        to: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
    ) {
        match EllipticalArc::from_endpoints(self.pos, to, rx, ry, x_axis_rotation, large_arc, sweep)
        {
            Some(arc) => {
                self.current.push(arc);
                self.pos = to;
                self.last_control = LastControl::None;
            }
            // zero radius draws a line; coincident endpoints draw nothing
            None if self.pos != to => self.line_to(to),
            None => self.last_control = LastControl::None,
        }
    }

    fn close(&mut self) {
        if self.pos != self.start {
            self.line_to(self.start);
        }
        self.flush();
        self.pos = self.start;
        self.last_control = LastControl::None;
    }

    fn finish(mut self) -> Vec<VectorPath> {
        self.flush();
        self.contours
    }
}

/// Parses the contents of a `d` attribute.
///
/// Absolute and relative forms of every SVG path command are accepted.
/// Subpaths without any drawing command are dropped, so the result may be
/// empty.
///
/// # Arguments
/// * `data` - Path data, e.g. `"M0 0 L10 0 Z"`
///
/// # Errors
/// [`EngineError::Svg`] if the data is malformed.
pub fn parse_path_data(data: &str) -> EngineResult<Vec<VectorPath>> {
    use svgtypes::PathSegment as Cmd;

    let mut builder = ContourBuilder::new();
    for segment in PathParser::from(data) {
        let segment = segment.map_err(|err| EngineError::svg(format!("invalid path data: {err}")))?;
        match segment {
            Cmd::MoveTo { abs, x, y } => {
                let to = builder.resolve(abs, x, y);
                builder.move_to(to);
            }
            Cmd::LineTo { abs, x, y } => {
                let to = builder.resolve(abs, x, y);
                builder.line_to(to);
            }
            Cmd::HorizontalLineTo { abs, x } => {
                let to = if abs {
                    Point::new(x, builder.pos.y)
                } else {
                    Point::new(builder.pos.x + x, builder.pos.y)
                };
                builder.line_to(to);
            }
            Cmd::VerticalLineTo { abs, y } => {
                let to = if abs {
                    Point::new(builder.pos.x, y)
                } else {
                    Point::new(builder.pos.x, builder.pos.y + y)
                };
                builder.line_to(to);
            }
            Cmd::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let ctrl1 = builder.resolve(abs, x1, y1);
                let ctrl2 = builder.resolve(abs, x2, y2);
                let to = builder.resolve(abs, x, y);
                builder.cubic_to(ctrl1, ctrl2, to);
            }
            Cmd::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = builder.reflected_cubic();
                let ctrl2 = builder.resolve(abs, x2, y2);
                let to = builder.resolve(abs, x, y);
                builder.cubic_to(ctrl1, ctrl2, to);
            }
            Cmd::Quadratic { abs, x1, y1, x, y } => {
                let ctrl = builder.resolve(abs, x1, y1);
                let to = builder.resolve(abs, x, y);
                builder.quadratic_to(ctrl, to);
            }
            Cmd::SmoothQuadratic { abs, x, y } => {
                let ctrl = builder.reflected_quadratic();
                let to = builder.resolve(abs, x, y);
                builder.quadratic_to(ctrl, to);
            }
            Cmd::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let to = builder.resolve(abs, x, y);
                builder.arc_to(to, rx, ry, x_axis_rotation, large_arc, sweep);
            }
            Cmd::ClosePath { .. } => builder.close(),
        }
    }
    Ok(builder.finish())
}

/// Collects the contours of every `<path>` element in an SVG document.
///
/// # Errors
/// [`EngineError::Svg`] if the document has no path data, any path's data is
/// malformed, or no path draws anything.
pub fn load_svg_str(document: &str) -> EngineResult<Vec<VectorPath>> {
    let pattern = path_d_regex()?;

    let mut elements = 0usize;
    let mut contours = Vec::new();
    for captures in pattern.captures_iter(document) {
        let Some(data) = captures.get(1).or_else(|| captures.get(2)) else {
            continue;
        };
        elements += 1;
        let parsed = parse_path_data(data.as_str())
            .map_err(|err| EngineError::svg(format!("path element {elements}: {err}")))?;
        contours.extend(parsed);
    }

    if elements == 0 {
        return Err(EngineError::svg("no <path> elements with a 'd' attribute"));
    }
    if contours.is_empty() {
        return Err(EngineError::svg("path data draws no segments"));
    }
    debug!(elements, contours = contours.len(), "loaded svg paths");
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            actual.distance(expected) < 1e-9,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn endpoints(path: &VectorPath) -> Vec<(Point, Point)> {
        path.segments()
            .iter()
            .map(|s| (s.evaluate(0.0), s.evaluate(1.0)))
            .collect()
    }

    #[test]
    fn test_closed_square() {
        let contours = parse_path_data("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        assert_eq!(contours.len(), 1);
        let path = &contours[0];
        assert_eq!(path.len(), 4);
        assert!((path.arc_length() - 40.0).abs() < 1e-9);

        let (_, last_end) = endpoints(path)[3];
        assert_close(last_end, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_relative_and_axis_commands() {
        let contours = parse_path_data("m5 5 h10 v10 H5 V5").unwrap();
        let ends: Vec<Point> = endpoints(&contours[0]).into_iter().map(|(_, e)| e).collect();
        assert_close(ends[0], Point::new(15.0, 5.0));
        assert_close(ends[1], Point::new(15.0, 15.0));
        assert_close(ends[2], Point::new(5.0, 15.0));
        assert_close(ends[3], Point::new(5.0, 5.0));
    }

    #[test]
    fn test_close_on_start_adds_no_segment() {
        let contours = parse_path_data("M0 0 L10 0 L0 0 Z").unwrap();
        assert_eq!(contours[0].len(), 2);
    }

    #[test]
    fn test_each_subpath_is_a_contour() {
        let contours = parse_path_data("M0 0 L1 0 Z M5 5 L6 5 M9 9").unwrap();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].len(), 2);
        assert_eq!(contours[1].len(), 1);
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let contours = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        let path = &contours[0];
        assert_eq!(path.len(), 2);
        // the reflected control is (10,-10), so the smooth piece is the
        // point reflection of the first through (10, 0)
        let first = &path.segments()[0];
        let second = &path.segments()[1];
        for t in [0.25, 0.5, 0.75] {
            let p = first.evaluate(t);
            let q = second.evaluate(t);
            assert_close(q, Point::new(p.x + 10.0, -p.y));
        }
    }

    #[test]
    fn test_smooth_quadratic_reflects_control() {
        let contours = parse_path_data("M0 0 Q5 10 10 0 T20 0").unwrap();
        let second = &contours[0].segments()[1];
        // reflected control (15,-10): midpoint is 0.25*(10,0)+0.5*(15,-10)+0.25*(20,0)
        assert_close(second.evaluate(0.5), Point::new(15.0, -5.0));
    }

    #[test]
    fn test_arc_half_circle() {
        let contours = parse_path_data("M-1 0 A1 1 0 0 1 1 0").unwrap();
        let arc = &contours[0].segments()[0];
        assert_close(arc.evaluate(0.0), Point::new(-1.0, 0.0));
        assert_close(arc.evaluate(1.0), Point::new(1.0, 0.0));
        assert!((arc.arc_length() - std::f64::consts::PI).abs() < 1e-3);
    }

    #[test]
    fn test_zero_radius_arc_is_a_line() {
        let contours = parse_path_data("M0 0 A0 0 0 0 1 3 4").unwrap();
        assert!((contours[0].arc_length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_data_rejected() {
        let err = parse_path_data("L10 10").unwrap_err();
        assert!(matches!(err, EngineError::Svg { .. }));
    }

    #[test]
    fn test_load_document() {
        let doc = r#"<?xml version="1.0"?>
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
              <rect id="bg" width="10" height="10"/>
              <path id="a" fill="none" d="M0 0 L10 0 L10 10 Z"/>
              <PATH d='M2 2 h4 v4 z'></PATH>
            </svg>"#;
        let contours = load_svg_str(doc).unwrap();
        assert_eq!(contours.len(), 2);
    }

    #[test]
    fn test_attribute_pattern_compiled_once() {
        let first = path_d_regex().unwrap();
        let second = path_d_regex().unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.captures_iter(r#"<path id='a' d='M0 0 L1 1'/>"#).count(), 1);
    }

    #[test]
    fn test_document_without_paths_rejected() {
        let err = load_svg_str("<svg><circle r='4'/></svg>").unwrap_err();
        assert!(err.to_string().contains("no <path>"));

        let err = load_svg_str(r#"<svg><path d="M1 1"/></svg>"#).unwrap_err();
        assert!(err.to_string().contains("draws no segments"));
    }
}
