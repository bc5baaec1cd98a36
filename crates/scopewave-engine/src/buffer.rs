//! Two-channel deflection buffers.

use crate::error::{EngineError, EngineResult};
use crate::wav::WavResult;

/// Paired X/Y sample channels at a fixed sample rate.
///
/// Both channels always have the same length and every sample lies in
/// `[-1, 1]`. Buffers are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    x: Vec<f64>,
    y: Vec<f64>,
    sample_rate: u32,
}

impl WaveformBuffer {
    /// Builds a buffer, checking length equality and range.
    ///
    /// # Errors
    /// [`EngineError::InvalidParameter`] if the channels differ in length or
    /// any sample is outside `[-1, 1]` (NaN included), and
    /// [`EngineError::InvalidSampleRate`] for a zero sample rate.
    pub fn new(x: Vec<f64>, y: Vec<f64>, sample_rate: u32) -> EngineResult<Self> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate { rate: sample_rate });
        }
        if x.len() != y.len() {
            return Err(EngineError::invalid_param(
                "channels",
                format!("length mismatch: x has {}, y has {}", x.len(), y.len()),
            ));
        }
        let in_range = |s: &f64| (-1.0..=1.0).contains(s);
        if !x.iter().all(in_range) || !y.iter().all(in_range) {
            return Err(EngineError::invalid_param(
                "channels",
                "samples must lie in [-1, 1]",
            ));
        }
        Ok(Self { x, y, sample_rate })
    }

    /// Wraps channels the caller has already dithered and clipped.
    pub(crate) fn from_clipped(x: Vec<f64>, y: Vec<f64>, sample_rate: u32) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(x.iter().chain(&y).all(|s| (-1.0..=1.0).contains(s)));
        Self { x, y, sample_rate }
    }

    /// X deflection (left channel).
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y deflection (right channel).
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample over both channels.
    pub fn peak(&self) -> f64 {
        self.x
            .iter()
            .chain(&self.y)
            .fold(0.0_f64, |peak, s| peak.max(s.abs()))
    }

    /// Encodes as 16-bit stereo WAV (left = X, right = Y).
    pub fn to_wav(&self) -> WavResult {
        WavResult::from_buffer(self)
    }
}
