//! Engine configuration.
//!
//! Every tunable the engine consumes lives here as plain data. Callers build
//! an [`EngineConfig`] in code or load one from JSON; missing fields take the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Highest sample rate accepted, in Hz.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Rejects a sample rate of zero or above [`MAX_SAMPLE_RATE`].
pub fn validate_sample_rate(rate: u32) -> EngineResult<()> {
    if rate == 0 || rate > MAX_SAMPLE_RATE {
        return Err(EngineError::InvalidSampleRate { rate });
    }
    Ok(())
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Path sampling density.
    pub sampling: SamplingConfig,
    /// Path rendering parameters.
    pub render: RenderConfig,
    /// Harmonic tone parameters.
    pub tone: ToneConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            sampling: SamplingConfig::default(),
            render: RenderConfig::default(),
            tone: ToneConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a JSON string and validates it.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file and validates it.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> EngineResult<()> {
        validate_sample_rate(self.sample_rate)?;
        self.sampling.validate()?;
        self.render.validate()?;
        self.tone.validate()
    }
}

/// Controls how many points are taken from each path segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Floor on the number of points per segment.
    pub min_samples: usize,
    /// Points per unit of arc length.
    pub density: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_samples: 100,
            density: 0.2,
        }
    }
}

impl SamplingConfig {
    /// Checks that the floor is non-zero and the density is usable.
    pub fn validate(&self) -> EngineResult<()> {
        if self.min_samples == 0 {
            return Err(EngineError::invalid_param(
                "sampling.min_samples",
                "must be at least 1",
            ));
        }
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(EngineError::invalid_param(
                "sampling.density",
                format!("must be finite and >= 0, got {}", self.density),
            ));
        }
        Ok(())
    }
}

/// Parameters for rendering a point loop into a waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Total output length in seconds.
    pub duration: f64,
    /// How many times the loop is traced per repetition period.
    pub speed_factor: f64,
    /// Number of repetition periods in the output.
    pub repeats: u32,
    /// Standard deviation of the Gaussian dither; 0 disables it.
    pub dither_std: f64,
    /// Seed for the dither stream.
    pub seed: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            duration: 10.0,
            speed_factor: 5.0,
            repeats: 10,
            dither_std: 0.001,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Checks duration, speed, repeat count and dither.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EngineError::InvalidDuration {
                duration: self.duration,
            });
        }
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(EngineError::invalid_param(
                "render.speed_factor",
                format!("must be finite and > 0, got {}", self.speed_factor),
            ));
        }
        if self.repeats == 0 {
            return Err(EngineError::invalid_param(
                "render.repeats",
                "must be at least 1",
            ));
        }
        validate_dither("render.dither_std", self.dither_std)
    }
}

/// Parameters for the harmonic tone synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToneConfig {
    /// Target peak amplitude after normalization.
    pub amplitude: f64,
    /// Length of the linear fade at each end, in seconds.
    pub fade_seconds: f64,
    /// Frequency multiplier applied to the Y fundamental in `xy` patterns.
    pub fundamental_detune: f64,
    /// Frequency multiplier applied to the Y harmonics in `xy` patterns.
    pub harmonic_detune: f64,
    /// Standard deviation of the Gaussian dither; 0 disables it.
    pub dither_std: f64,
    /// Seed for the dither stream.
    pub seed: u32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.3,
            fade_seconds: 0.05,
            fundamental_detune: 1.01,
            harmonic_detune: 1.02,
            dither_std: 0.0,
            seed: 0,
        }
    }
}

impl ToneConfig {
    /// Checks amplitude, fade length, detune factors and dither.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.amplitude.is_finite() || self.amplitude <= 0.0 || self.amplitude > 1.0 {
            return Err(EngineError::invalid_param(
                "tone.amplitude",
                format!("must be in (0, 1], got {}", self.amplitude),
            ));
        }
        if !self.fade_seconds.is_finite() || self.fade_seconds < 0.0 {
            return Err(EngineError::invalid_param(
                "tone.fade_seconds",
                format!("must be finite and >= 0, got {}", self.fade_seconds),
            ));
        }
        for (name, value) in [
            ("tone.fundamental_detune", self.fundamental_detune),
            ("tone.harmonic_detune", self.harmonic_detune),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid_param(
                    name,
                    format!("must be finite and > 0, got {value}"),
                ));
            }
        }
        validate_dither("tone.dither_std", self.dither_std)
    }
}

fn validate_dither(name: &str, std_dev: f64) -> EngineResult<()> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(EngineError::invalid_param(
            name,
            format!("must be finite and >= 0, got {std_dev}"),
        ));
    }
    Ok(())
}
