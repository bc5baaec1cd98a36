//! Resampling a closed point loop into X/Y sample channels.
//!
//! The point sequence is treated as a loop of `N` points. The output is cut
//! into `repeats` equal periods; within each period the loop is traced
//! `speed_factor` times, with linear interpolation between neighbouring
//! points and indices wrapping modulo `N` so the figure always closes.

use tracing::{debug, warn};

use crate::buffer::WaveformBuffer;
use crate::config::{validate_sample_rate, EngineConfig, RenderConfig};
use crate::dither::dither_and_clip;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Point, VectorPath};
use crate::normalize::{normalize, normalize_or_center};
use crate::sampler::sample_paths;

/// Longest rendering accepted, in seconds.
pub const MAX_DURATION_SECONDS: f64 = 600.0;

const DITHER_STAGE: &str = "render";

/// Everything the renderer needs besides the points.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub sample_rate: u32,
    pub duration: f64,
    pub speed_factor: f64,
    pub repeats: u32,
    pub dither_std: f64,
    pub seed: u32,
}

impl RenderParams {
    /// Takes the render section and sample rate of an engine config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sample_rate, &config.render)
    }

    pub fn new(sample_rate: u32, render: &RenderConfig) -> Self {
        Self {
            sample_rate,
            duration: render.duration,
            speed_factor: render.speed_factor,
            repeats: render.repeats,
            dither_std: render.dither_std,
            seed: render.seed,
        }
    }

    /// `floor(sample_rate * duration)`.
    pub fn num_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration).floor() as usize
    }

    fn validate(&self) -> EngineResult<()> {
        validate_sample_rate(self.sample_rate)?;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EngineError::InvalidDuration {
                duration: self.duration,
            });
        }
        if self.duration > MAX_DURATION_SECONDS {
            return Err(EngineError::invalid_param(
                "duration",
                format!(
                    "must be <= {} seconds, got {}",
                    MAX_DURATION_SECONDS, self.duration
                ),
            ));
        }
        RenderConfig {
            duration: self.duration,
            speed_factor: self.speed_factor,
            repeats: self.repeats,
            dither_std: self.dither_std,
            seed: self.seed,
        }
        .validate()
    }
}

/// Renders normalized point loops as deflection waveforms.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    params: RenderParams,
}

impl WaveformRenderer {
    pub fn new(params: RenderParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Renders a normalized point loop.
    ///
    /// # Arguments
    /// * `points` - Loop in deflection coordinates; the last point joins the
    ///   first
    ///
    /// # Errors
    /// - [`EngineError::EmptyGeometry`] for fewer than two points.
    /// - Parameter validation errors for the sample rate, duration, speed
    ///   factor, repeat count or dither.
    pub fn render(&self, points: &[Point]) -> EngineResult<WaveformBuffer> {
        let params = &self.params;
        params.validate()?;
        if points.len() < 2 {
            return Err(EngineError::EmptyGeometry {
                required: 2,
                found: points.len(),
            });
        }

        let num_samples = params.num_samples();
        let (mut x, mut y) = trace_loop(points, num_samples, params.repeats, params.speed_factor);
        dither_and_clip(&mut x, &mut y, params.dither_std, params.seed, DITHER_STAGE);

        debug!(
            points = points.len(),
            samples = num_samples,
            speed_factor = params.speed_factor,
            repeats = params.repeats,
            "rendered waveform"
        );
        Ok(WaveformBuffer::from_clipped(x, y, params.sample_rate))
    }
}

/// Interpolates `num_samples` positions around the loop, before dither.
fn trace_loop(
    points: &[Point],
    num_samples: usize,
    repeats: u32,
    speed_factor: f64,
) -> (Vec<f64>, Vec<f64>) {
    let total_points = points.len();
    let n = total_points as f64;
    let samples_per_repetition = num_samples as f64 / repeats as f64;

    let mut x = Vec::with_capacity(num_samples);
    let mut y = Vec::with_capacity(num_samples);
    for i in 0..num_samples {
        let pos_in_rep = (i as f64 % samples_per_repetition) / samples_per_repetition;
        let point_position = (pos_in_rep * speed_factor * n) % n;
        let whole = point_position.floor();
        let idx1 = whole as usize % total_points;
        let idx2 = (idx1 + 1) % total_points;
        let alpha = point_position - whole;

        let p = points[idx1].lerp(points[idx2], alpha);
        x.push(p.x);
        y.push(p.y);
    }
    (x, y)
}

/// Full path pipeline: sample, normalize, render.
///
/// A contour set whose bounding box is flat on one axis is drawn through the
/// centre of that axis rather than rejected.
///
/// # Arguments
/// * `paths` - Contours in drawing order, sharing one bounding box
/// * `config` - Sampling density, render parameters and sample rate
///
/// # Errors
/// Anything [`sample_paths`] or [`WaveformRenderer::render`] reports.
pub fn render_paths(paths: &[VectorPath], config: &EngineConfig) -> EngineResult<WaveformBuffer> {
    let points = sample_paths(paths, &config.sampling)?;
    let normalized = match normalize(&points) {
        Err(EngineError::DegenerateGeometry { width, height }) => {
            warn!(width, height, "flat bounding box, centring degenerate axis");
            normalize_or_center(&points)?
        }
        other => other?,
    };
    WaveformRenderer::new(RenderParams::from_config(config)).render(&normalized)
}
