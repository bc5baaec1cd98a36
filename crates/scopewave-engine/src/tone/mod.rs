//! Note-driven harmonic XY patterns.
//!
//! A [`ToneSpec`] names a tone by its fundamental, harmonic count, length
//! and pattern kind. The [`HarmonicToneSynthesizer`] turns it into a
//! [`WaveformBuffer`](crate::WaveformBuffer); anything implementing
//! [`ToneRenderer`] can stand in for it behind a cache.

mod envelope;
mod synth;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::WaveformBuffer;
use crate::error::{EngineError, EngineResult};

pub use envelope::{apply_fades, fade_gain};
pub use synth::HarmonicToneSynthesizer;

/// Highest harmonic count accepted.
pub const MAX_HARMONICS: u32 = 256;

/// Longest tone accepted, in seconds.
pub const MAX_TONE_SECONDS: f64 = 60.0;

/// Shape of the figure a tone draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Y partials are the X partials in quadrature: a stationary figure.
    Simple,
    /// Y is detuned from X: the figure slowly rotates.
    Xy,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Simple => "simple",
            PatternKind::Xy => "xy",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(PatternKind::Simple),
            "xy" => Ok(PatternKind::Xy),
            other => Err(EngineError::invalid_param(
                "kind",
                format!("expected 'simple' or 'xy', got '{other}'"),
            )),
        }
    }
}

/// Synthesis request and cache key.
///
/// Equality and hashing compare the float fields by bit pattern, so two
/// specs are the same key exactly when they were built from the same
/// numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToneSpec {
    /// Fundamental frequency in Hz.
    pub frequency: f64,
    /// Number of overtones above the fundamental.
    pub harmonics: u32,
    /// Length in seconds.
    pub duration: f64,
    pub kind: PatternKind,
}

impl ToneSpec {
    pub fn new(frequency: f64, harmonics: u32, duration: f64, kind: PatternKind) -> Self {
        Self {
            frequency,
            harmonics,
            duration,
            kind,
        }
    }

    /// Checks the spec is synthesizable.
    ///
    /// # Errors
    /// [`EngineError::InvalidToneSpec`] for a non-positive or non-finite
    /// frequency or duration, or out-of-range harmonic count or length.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(EngineError::invalid_tone(format!(
                "frequency must be finite and > 0, got {}",
                self.frequency
            )));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(EngineError::invalid_tone(format!(
                "duration must be finite and > 0, got {}",
                self.duration
            )));
        }
        if self.duration > MAX_TONE_SECONDS {
            return Err(EngineError::invalid_tone(format!(
                "duration must be <= {MAX_TONE_SECONDS} seconds, got {}",
                self.duration
            )));
        }
        if self.harmonics > MAX_HARMONICS {
            return Err(EngineError::invalid_tone(format!(
                "harmonics must be <= {MAX_HARMONICS}, got {}",
                self.harmonics
            )));
        }
        Ok(())
    }

    fn key(&self) -> (u64, u32, u64, PatternKind) {
        (
            self.frequency.to_bits(),
            self.harmonics,
            self.duration.to_bits(),
            self.kind,
        )
    }
}

impl PartialEq for ToneSpec {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ToneSpec {}

impl Hash for ToneSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for ToneSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2}Hz h{} {}s {}",
            self.frequency, self.harmonics, self.duration, self.kind
        )
    }
}

/// Something that can synthesize a tone.
pub trait ToneRenderer: Send + Sync {
    /// Produces the buffer for `spec`.
    fn render_tone(&self, spec: &ToneSpec) -> EngineResult<WaveformBuffer>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structural_equality() {
        let a = ToneSpec::new(440.0, 3, 1.0, PatternKind::Xy);
        let b = ToneSpec::new(440.0, 3, 1.0, PatternKind::Xy);
        let c = ToneSpec::new(440.0, 3, 1.0, PatternKind::Simple);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(ToneSpec::new(440.0, 0, 1.0, PatternKind::Xy).validate().is_ok());

        for bad in [
            ToneSpec::new(0.0, 3, 1.0, PatternKind::Xy),
            ToneSpec::new(-440.0, 3, 1.0, PatternKind::Xy),
            ToneSpec::new(f64::INFINITY, 3, 1.0, PatternKind::Xy),
            ToneSpec::new(440.0, 3, 0.0, PatternKind::Xy),
            ToneSpec::new(440.0, 3, f64::NAN, PatternKind::Xy),
            ToneSpec::new(440.0, MAX_HARMONICS + 1, 1.0, PatternKind::Xy),
        ] {
            let err = bad.validate().unwrap_err();
            assert!(matches!(err, EngineError::InvalidToneSpec { .. }), "{bad}");
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("XY".parse::<PatternKind>().unwrap(), PatternKind::Xy);
        assert_eq!("simple".parse::<PatternKind>().unwrap(), PatternKind::Simple);
        assert!("circle".parse::<PatternKind>().is_err());
        assert_eq!(
            serde_json::to_string(&PatternKind::Simple).unwrap(),
            "\"simple\""
        );
    }
}
