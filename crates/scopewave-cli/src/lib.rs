//! Scopewave CLI library.
//!
//! Command implementations for the `scopewave` binary: rendering SVG
//! drawings and harmonic tones to XY oscilloscope WAV files.

pub mod commands;
pub mod logging;
pub mod settings;
