//! Encoded WAV output.

use std::path::Path;

use crate::buffer::WaveformBuffer;

use super::format::WavFormat;
use super::writer::{stereo_to_pcm16, write_wav_to_vec};

/// An encoded stereo WAV file plus its identifying metadata.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM data only.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of sample frames.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes X on the left channel and Y on the right.
    pub fn from_channels(x: &[f64], y: &[f64], sample_rate: u32) -> Self {
        let pcm = stereo_to_pcm16(x, y);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = write_wav_to_vec(&WavFormat::stereo(sample_rate), &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate,
            num_samples: x.len().min(y.len()),
        }
    }

    /// Encodes a waveform buffer.
    pub fn from_buffer(buffer: &WaveformBuffer) -> Self {
        Self::from_channels(buffer.x(), buffer.y(), buffer.sample_rate())
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_samples as f64 / self.sample_rate as f64
    }

    /// Writes the file bytes to `path`.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.wav_data)
    }
}
