//! Mapping point clouds into the deflection square `[-1, 1] x [-1, 1]`.
//!
//! Each axis is scaled independently so the bounding box fills the square.
//! The vertical axis is inverted: image coordinates grow downwards, scope
//! deflection grows upwards.

use crate::error::{EngineError, EngineResult};
use crate::geometry::Point;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Bounding box of a point set, or `None` if it is empty.
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().skip(1).fold(
            Bounds {
                min: first,
                max: first,
            },
            |b, p| Bounds {
                min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        ))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Zero width, allowing for rounding noise.
    pub fn is_flat_x(&self) -> bool {
        is_flat(self.min.x, self.max.x)
    }

    /// Zero height, allowing for rounding noise.
    pub fn is_flat_y(&self) -> bool {
        is_flat(self.min.y, self.max.y)
    }
}

/// Extents at or below this fraction of the coordinate magnitude count as
/// zero.
const RELATIVE_FLAT_EPSILON: f64 = 1e-12;

/// Whether the range `[min, max]` is too narrow to stretch over `[-1, 1]`.
fn is_flat(min: f64, max: f64) -> bool {
    let scale = min.abs().max(max.abs()).max(1.0);
    max - min <= RELATIVE_FLAT_EPSILON * scale
}

#[inline]
fn to_unit(value: f64, min: f64, extent: f64) -> f64 {
    2.0 * (value - min) / extent - 1.0
}

/// Normalizes points into the deflection square.
///
/// # Errors
/// - [`EngineError::EmptyGeometry`] for an empty input.
/// - [`EngineError::DegenerateGeometry`] when the bounding box has zero
///   width or zero height, up to rounding noise.
pub fn normalize(points: &[Point]) -> EngineResult<Vec<Point>> {
    let bounds = Bounds::of(points).ok_or(EngineError::EmptyGeometry {
        required: 1,
        found: 0,
    })?;
    let (width, height) = (bounds.width(), bounds.height());
    if bounds.is_flat_x() || bounds.is_flat_y() {
        return Err(EngineError::DegenerateGeometry { width, height });
    }

    Ok(points
        .iter()
        .map(|p| {
            Point::new(
                to_unit(p.x, bounds.min.x, width),
                -to_unit(p.y, bounds.min.y, height),
            )
        })
        .collect())
}

/// Like [`normalize`], but a zero-extent axis maps to `0.0` instead of
/// failing, so a single point lands in the centre and a straight
/// horizontal or vertical line runs through it.
///
/// # Errors
/// [`EngineError::EmptyGeometry`] for an empty input.
pub fn normalize_or_center(points: &[Point]) -> EngineResult<Vec<Point>> {
    match normalize(points) {
        Err(EngineError::DegenerateGeometry { .. }) => {
            let bounds = Bounds::of(points).ok_or(EngineError::EmptyGeometry {
                required: 1,
                found: 0,
            })?;
            let axis = |value: f64, min: f64, extent: f64, flat: bool| {
                if flat {
                    0.0
                } else {
                    to_unit(value, min, extent)
                }
            };
            let (flat_x, flat_y) = (bounds.is_flat_x(), bounds.is_flat_y());
            Ok(points
                .iter()
                .map(|p| {
                    Point::new(
                        axis(p.x, bounds.min.x, bounds.width(), flat_x),
                        -axis(p.y, bounds.min.y, bounds.height(), flat_y),
                    )
                })
                .collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extremes_map_to_unit_square() {
        let points = vec![
            Point::new(10.0, 20.0),
            Point::new(30.0, 60.0),
            Point::new(20.0, 40.0),
        ];
        let normalized = normalize(&points).unwrap();

        assert_eq!(
            normalized,
            vec![
                Point::new(-1.0, 1.0),
                Point::new(1.0, -1.0),
                Point::new(0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_all_coordinates_in_range() {
        let points: Vec<Point> = (0..50)
            .map(|i| {
                let t = i as f64 * 0.37;
                Point::new(t.sin() * 300.0 + 12.0, t.cos() * -7.5 + t)
            })
            .collect();
        let normalized = normalize(&points).unwrap();

        assert!(normalized
            .iter()
            .all(|p| (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y)));
        let bounds = Bounds::of(&normalized).unwrap();
        assert_eq!(bounds.min, Point::new(-1.0, -1.0));
        assert_eq!(bounds.max, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_degenerate_width_rejected() {
        let points = vec![Point::new(5.0, 0.0), Point::new(5.0, 10.0)];
        let err = normalize(&points).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DegenerateGeometry { width, .. } if width == 0.0
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            normalize(&[]).unwrap_err(),
            EngineError::EmptyGeometry { .. }
        ));
    }

    #[test]
    fn test_center_fallback_for_horizontal_line() {
        let points = vec![Point::new(0.0, 3.0), Point::new(4.0, 3.0)];
        let normalized = normalize_or_center(&points).unwrap();
        assert_eq!(normalized, vec![Point::new(-1.0, 0.0), Point::new(1.0, 0.0)]);
    }

    #[test]
    fn test_rounding_noise_counts_as_flat() {
        let points = vec![
            Point::new(0.0, 5.0),
            Point::new(5.0, 4.999999999999999),
            Point::new(10.0, 5.0),
        ];
        assert!(matches!(
            normalize(&points).unwrap_err(),
            EngineError::DegenerateGeometry { .. }
        ));
        let normalized = normalize_or_center(&points).unwrap();
        assert!(normalized.iter().all(|p| p.y == 0.0));
        assert_eq!(normalized[2].x, 1.0);
    }

    #[test]
    fn test_small_drawings_are_not_flat() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1e-6, 1e-6)];
        let normalized = normalize(&points).unwrap();
        assert_eq!(normalized[1], Point::new(1.0, -1.0));
    }

    #[test]
    fn test_center_fallback_for_single_point() {
        let normalized = normalize_or_center(&[Point::new(7.0, 7.0)]).unwrap();
        assert_eq!(normalized, vec![Point::new(0.0, 0.0)]);
    }
}
