//! Scopewave Engine
//!
//! Turns drawings and notes into stereo audio for an oscilloscope in XY
//! mode: the left channel drives horizontal deflection and the right
//! channel drives vertical deflection.
//!
//! # Overview
//!
//! Two pipelines share one output type, [`WaveformBuffer`]:
//!
//! - **Paths** - vector contours are sampled proportionally to arc length,
//!   normalized into `[-1, 1]` and traced repeatedly by the
//!   [`WaveformRenderer`].
//! - **Tones** - a [`ToneSpec`] is synthesized by the
//!   [`HarmonicToneSynthesizer`] into a Lissajous-style figure and memoized
//!   by a [`ToneCache`].
//!
//! # Determinism
//!
//! Everything is deterministic. The optional Gaussian dither draws from
//! PCG32 streams whose seeds are derived with BLAKE3, so a fixed seed gives
//! byte-identical WAV output.
//!
//! # Example
//!
//! ```ignore
//! use scopewave_engine::{svg, render_paths, EngineConfig};
//!
//! let paths = svg::load_svg_str(&std::fs::read_to_string("star.svg")?)?;
//! let buffer = render_paths(&paths, &EngineConfig::default())?;
//! buffer.to_wav().save("star.wav".as_ref())?;
//! ```
//!
//! # Crate Structure
//!
//! - [`geometry`] - points, segments and vector paths
//! - [`sampler`] - arc-length-proportional point sampling
//! - [`normalize`] - bounding-box normalization
//! - [`render`] - point loops to deflection waveforms
//! - [`tone`] - harmonic XY tone synthesis
//! - [`cache`] - memoized tone synthesis
//! - [`keyboard`] - key events to tone playback
//! - [`svg`] - SVG path data loading
//! - [`wav`] - deterministic WAV writer

pub mod buffer;
pub mod cache;
pub mod config;
pub mod dither;
pub mod error;
pub mod geometry;
pub mod keyboard;
pub mod normalize;
pub mod render;
pub mod rng;
pub mod sampler;
pub mod svg;
pub mod tone;
pub mod wav;

// Re-export main types at crate root
pub use buffer::WaveformBuffer;
pub use cache::{MemoryToneCache, ToneCache};
pub use config::{
    EngineConfig, RenderConfig, SamplingConfig, ToneConfig, DEFAULT_SAMPLE_RATE,
    MAX_SAMPLE_RATE,
};
pub use error::{EngineError, EngineResult};
pub use geometry::{PathSegment, Point, VectorPath};
pub use normalize::{normalize, normalize_or_center};
pub use render::{render_paths, RenderParams, WaveformRenderer};
pub use sampler::{sample_path, sample_paths};
pub use tone::{HarmonicToneSynthesizer, PatternKind, ToneRenderer, ToneSpec};
pub use wav::WavResult;
