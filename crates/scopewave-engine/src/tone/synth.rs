//! Harmonic XY tone synthesis.

use std::f64::consts::{FRAC_PI_2, TAU};

use tracing::debug;

use crate::buffer::WaveformBuffer;
use crate::config::{validate_sample_rate, EngineConfig, ToneConfig};
use crate::dither::dither_and_clip;
use crate::error::EngineResult;

use super::envelope::apply_fades;
use super::{PatternKind, ToneRenderer, ToneSpec};

/// Share of the amplitude given to the fundamental.
const FUNDAMENTAL_WEIGHT: f64 = 0.7;

/// Overtone `i` gets `OVERTONE_WEIGHT / i` of the amplitude.
const OVERTONE_WEIGHT: f64 = 0.3;

/// Phase offset per harmonic index on the undetuned voice, in radians.
const HARMONIC_PHASE_STEP: f64 = 0.4;

const DITHER_STAGE: &str = "tone";

/// One channel's recipe: how its partials are tuned and phased.
#[derive(Debug, Clone, Copy)]
struct Voice {
    fundamental_scale: f64,
    harmonic_scale: f64,
    phase_step: f64,
    phase_shift: f64,
}

impl Voice {
    const PRIMARY: Voice = Voice {
        fundamental_scale: 1.0,
        harmonic_scale: 1.0,
        phase_step: HARMONIC_PHASE_STEP,
        phase_shift: 0.0,
    };

    const QUADRATURE: Voice = Voice {
        phase_shift: FRAC_PI_2,
        ..Voice::PRIMARY
    };

    fn detuned(config: &ToneConfig) -> Voice {
        Voice {
            fundamental_scale: config.fundamental_detune,
            harmonic_scale: config.harmonic_detune,
            phase_step: 0.0,
            phase_shift: 0.0,
        }
    }

    fn render(
        &self,
        frequency: f64,
        harmonics: u32,
        amplitude: f64,
        num_samples: usize,
        sample_rate: f64,
    ) -> Vec<f64> {
        let fundamental = TAU * frequency * self.fundamental_scale;
        let overtones: Vec<(f64, f64, f64)> = (2..=harmonics + 1)
            .map(|i| {
                let i = i as f64;
                (
                    amplitude * OVERTONE_WEIGHT / i,
                    TAU * frequency * i * self.harmonic_scale,
                    self.phase_step * i + self.phase_shift,
                )
            })
            .collect();

        (0..num_samples)
            .map(|n| {
                let t = n as f64 / sample_rate;
                let base = FUNDAMENTAL_WEIGHT
                    * amplitude
                    * (fundamental * t + self.phase_shift).sin();
                overtones
                    .iter()
                    .fold(base, |acc, &(gain, omega, phase)| {
                        acc + gain * (omega * t + phase).sin()
                    })
            })
            .collect()
    }
}

/// Generates two-channel harmonic figures from a [`ToneSpec`].
///
/// X is a fundamental plus `harmonics` overtones with falling weights.
/// For [`PatternKind::Xy`] the Y channel repeats that construction slightly
/// detuned, so the figure precesses; for [`PatternKind::Simple`] every
/// partial of Y is the matching partial of X a quarter of its own period
/// ahead (cosine for sine). Both channels are faded at the ends and jointly
/// normalized so the louder one peaks at the configured amplitude.
#[derive(Debug, Clone)]
pub struct HarmonicToneSynthesizer {
    sample_rate: u32,
    config: ToneConfig,
}

impl HarmonicToneSynthesizer {
    pub fn new(sample_rate: u32, config: ToneConfig) -> Self {
        Self {
            sample_rate,
            config,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sample_rate, config.tone.clone())
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    /// Renders `spec`.
    ///
    /// # Errors
    /// [`InvalidToneSpec`](crate::EngineError::InvalidToneSpec) for an invalid spec; sample rate or
    /// config errors if the synthesizer itself was misconfigured.
    pub fn synthesize(&self, spec: &ToneSpec) -> EngineResult<WaveformBuffer> {
        spec.validate()?;
        validate_sample_rate(self.sample_rate)?;
        self.config.validate()?;

        let sample_rate = self.sample_rate as f64;
        let amplitude = self.config.amplitude;
        let num_samples = (sample_rate * spec.duration).floor() as usize;

        let y_voice = match spec.kind {
            PatternKind::Xy => Voice::detuned(&self.config),
            PatternKind::Simple => Voice::QUADRATURE,
        };
        let mut x = Voice::PRIMARY.render(
            spec.frequency,
            spec.harmonics,
            amplitude,
            num_samples,
            sample_rate,
        );
        let mut y = y_voice.render(
            spec.frequency,
            spec.harmonics,
            amplitude,
            num_samples,
            sample_rate,
        );

        let fade_samples = (self.config.fade_seconds * sample_rate).round() as usize;
        apply_fades(&mut x, fade_samples);
        apply_fades(&mut y, fade_samples);

        normalize_jointly(&mut x, &mut y, amplitude);
        dither_and_clip(
            &mut x,
            &mut y,
            self.config.dither_std,
            self.config.seed,
            DITHER_STAGE,
        );

        debug!(tone = %spec, samples = num_samples, "synthesized tone");
        Ok(WaveformBuffer::from_clipped(x, y, self.sample_rate))
    }
}

impl ToneRenderer for HarmonicToneSynthesizer {
    fn render_tone(&self, spec: &ToneSpec) -> EngineResult<WaveformBuffer> {
        self.synthesize(spec)
    }
}

/// Scales both channels by one gain so the joint peak equals `target`.
fn normalize_jointly(x: &mut [f64], y: &mut [f64], target: f64) {
    let peak = x
        .iter()
        .chain(y.iter())
        .fold(0.0_f64, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        let gain = target / peak;
        for sample in x.iter_mut().chain(y.iter_mut()) {
            *sample *= gain;
        }
    }
}
