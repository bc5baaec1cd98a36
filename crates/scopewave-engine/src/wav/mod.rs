//! Deterministic WAV file writer.
//!
//! Writes 16-bit PCM stereo WAV files with no timestamps or variable
//! metadata: left carries X deflection, right carries Y deflection. The
//! BLAKE3 hash of the PCM payload identifies a rendering independent of the
//! container bytes.

mod format;
mod pcm;
mod result;
mod writer;

#[cfg(test)]
mod tests;

pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use result::WavResult;
pub use writer::{stereo_to_pcm16, write_wav, write_wav_to_vec};
