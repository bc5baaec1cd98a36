//! Arc-length-proportional path sampling.
//!
//! Each segment contributes `max(min_samples, floor(arc_length * density))`
//! points taken at evenly spaced parameters over the closed interval
//! `[0, 1]`, so longer segments receive more points and every segment keeps
//! at least the floor.

use tracing::debug;

use crate::config::SamplingConfig;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{PathSegment, Point, VectorPath};

/// Number of points allotted to one segment.
///
/// # Arguments
/// * `segment` - Segment to measure
/// * `config` - Density and per-segment floor
///
/// # Returns
/// `max(min_samples, floor(arc_length * density))`; a non-finite length
/// counts as zero
pub fn samples_for_segment(segment: &dyn PathSegment, config: &SamplingConfig) -> usize {
    let length = segment.arc_length();
    let scaled = if length.is_finite() && length > 0.0 {
        (length * config.density).floor() as usize
    } else {
        0
    };
    scaled.max(config.min_samples)
}

/// Samples a single segment, appending its points to `out`.
fn sample_segment(segment: &dyn PathSegment, num_samples: usize, out: &mut Vec<Point>) {
    if num_samples == 1 {
        out.push(segment.evaluate(0.0));
        return;
    }
    let last = (num_samples - 1) as f64;
    out.extend((0..num_samples).map(|i| segment.evaluate(i as f64 / last)));
}

/// Converts a vector path into an ordered point sequence.
///
/// # Arguments
/// * `path` - Contour to sample
/// * `config` - Density and per-segment floor
///
/// # Errors
/// [`EngineError::InvalidPath`] if the path has no segments.
pub fn sample_path(path: &VectorPath, config: &SamplingConfig) -> EngineResult<Vec<Point>> {
    if path.is_empty() {
        return Err(EngineError::invalid_path("path contains no segments"));
    }

    let counts: Vec<usize> = path
        .segments()
        .iter()
        .map(|segment| samples_for_segment(segment.as_ref(), config))
        .collect();
    let mut points = Vec::with_capacity(counts.iter().sum());
    for (segment, &count) in path.segments().iter().zip(&counts) {
        sample_segment(segment.as_ref(), count, &mut points);
    }

    debug!(
        segments = path.len(),
        points = points.len(),
        "sampled path"
    );
    Ok(points)
}

/// Samples several contours in order and concatenates their points.
///
/// # Errors
/// [`EngineError::InvalidPath`] if `paths` is empty or any path has no
/// segments.
pub fn sample_paths(paths: &[VectorPath], config: &SamplingConfig) -> EngineResult<Vec<Point>> {
    if paths.is_empty() {
        return Err(EngineError::invalid_path("no paths to sample"));
    }
    let mut points = Vec::new();
    for (index, path) in paths.iter().enumerate() {
        let sampled = sample_path(path, config).map_err(|err| match err {
            EngineError::InvalidPath { message } => {
                EngineError::invalid_path(format!("path {index}: {message}"))
            }
            other => other,
        })?;
        points.extend(sampled);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineSegment;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> LineSegment {
        LineSegment::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn test_empty_path_rejected() {
        let err = sample_path(&VectorPath::new(), &SamplingConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPath { .. }));
    }

    #[test]
    fn test_short_segment_gets_floor() {
        let path = VectorPath::new().with(line(0.0, 0.0, 10.0, 0.0));
        let points = sample_path(&path, &SamplingConfig::default()).unwrap();
        assert_eq!(points.len(), 100);
    }

    #[test]
    fn test_long_segment_scales_with_length() {
        // 1000 units * 0.2 = 200 points
        let path = VectorPath::new().with(line(0.0, 0.0, 1000.0, 0.0));
        let points = sample_path(&path, &SamplingConfig::default()).unwrap();
        assert_eq!(points.len(), 200);
    }

    #[test]
    fn test_parameters_include_both_ends() {
        let path = VectorPath::new().with(line(0.0, 0.0, 99.0, 0.0));
        let points = sample_path(&path, &SamplingConfig::default()).unwrap();

        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(points[99], Point::new(99.0, 0.0));
        // 100 points over 99 units: one unit apart
        assert!((points[1].x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_order_preserved() {
        let path = VectorPath::new()
            .with(line(0.0, 0.0, 1.0, 0.0))
            .with(line(1.0, 0.0, 1.0, 1.0));
        let points = sample_path(&path, &SamplingConfig::default()).unwrap();

        assert_eq!(points.len(), 200);
        assert!(points[..100].iter().all(|p| p.y == 0.0));
        assert!(points[100..].iter().all(|p| p.x == 1.0));
    }

    #[test]
    fn test_zero_length_segment_yields_floor_of_identical_points() {
        let path = VectorPath::new().with(line(3.0, 4.0, 3.0, 4.0));
        let points = sample_path(&path, &SamplingConfig::default()).unwrap();

        assert_eq!(points.len(), 100);
        assert!(points.iter().all(|&p| p == Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_single_sample_floor() {
        let config = SamplingConfig {
            min_samples: 1,
            density: 0.0,
        };
        let path = VectorPath::new().with(line(0.0, 0.0, 5.0, 0.0));
        assert_eq!(sample_path(&path, &config).unwrap(), vec![Point::new(0.0, 0.0)]);
    }

    #[test]
    fn test_sample_paths_reports_failing_index() {
        let paths = vec![VectorPath::new().with(line(0.0, 0.0, 1.0, 1.0)), VectorPath::new()];
        let err = sample_paths(&paths, &SamplingConfig::default()).unwrap_err();
        assert!(err.to_string().contains("path 1"));

        let err = sample_paths(&[], &SamplingConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPath { .. }));
    }
}
