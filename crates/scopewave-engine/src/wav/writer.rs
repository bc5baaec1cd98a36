//! RIFF/WAVE serialization and PCM conversion.

use std::io::{self, Write};

use super::format::WavFormat;

/// Size of the canonical PCM header.
pub(crate) const HEADER_LEN: usize = 44;

/// Builds the canonical 44-byte header for `data_size` bytes of PCM.
pub(super) fn header(format: &WavFormat, data_size: u32) -> [u8; HEADER_LEN] {
    // Total file size minus the 8-byte RIFF preamble
    let file_size = data_size.saturating_add(36);
    let mut out = [0u8; HEADER_LEN];

    out[0..4].copy_from_slice(b"RIFF");
    out[4..8].copy_from_slice(&file_size.to_le_bytes());
    out[8..12].copy_from_slice(b"WAVE");

    out[12..16].copy_from_slice(b"fmt ");
    out[16..20].copy_from_slice(&16u32.to_le_bytes()); // chunk size for PCM
    out[20..22].copy_from_slice(&1u16.to_le_bytes()); // format 1 = PCM
    out[22..24].copy_from_slice(&format.channels.to_le_bytes());
    out[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    out[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    out[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    out[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    out[36..40].copy_from_slice(b"data");
    out[40..44].copy_from_slice(&data_size.to_le_bytes());
    out
}

/// Writes a complete WAV file to a writer.
///
/// # Arguments
/// * `writer` - Output writer
/// * `format` - WAV format parameters
/// * `pcm_data` - Raw PCM samples as bytes
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "PCM data exceeds 4 GiB"))?;
    writer.write_all(&header(format, data_size))?;
    writer.write_all(pcm_data)
}

/// Writes a WAV file to a byte vector.
///
/// PCM payloads are produced from in-memory buffers and stay far below the
/// 4 GiB RIFF limit; the size field saturates rather than wrapping.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> Vec<u8> {
    let data_size = u32::try_from(pcm_data.len()).unwrap_or(u32::MAX);
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    buffer.extend_from_slice(&header(format, data_size));
    buffer.extend_from_slice(pcm_data);
    buffer
}

#[inline]
fn to_pcm16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0).round() as i16
}

/// Converts two channels to interleaved little-endian 16-bit PCM.
///
/// Samples outside `[-1, 1]` are clipped. If the channels differ in length
/// the shorter one decides the frame count.
pub fn stereo_to_pcm16(left: &[f64], right: &[f64]) -> Vec<u8> {
    let len = left.len().min(right.len());
    let mut pcm = Vec::with_capacity(len * 4);

    for (&l, &r) in left.iter().zip(right) {
        pcm.extend_from_slice(&to_pcm16(l).to_le_bytes());
        pcm.extend_from_slice(&to_pcm16(r).to_le_bytes());
    }

    pcm
}
