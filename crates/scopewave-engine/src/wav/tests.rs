//! Tests for the WAV writer module.

use super::format::WavFormat;
use super::pcm::{compute_pcm_hash, extract_pcm_data};
use super::result::WavResult;
use super::writer::{header, stereo_to_pcm16, write_wav, write_wav_to_vec};

fn frame(pcm: &[u8], index: usize) -> (i16, i16) {
    let base = index * 4;
    (
        i16::from_le_bytes([pcm[base], pcm[base + 1]]),
        i16::from_le_bytes([pcm[base + 2], pcm[base + 3]]),
    )
}

#[test]
fn test_stereo_format_fields() {
    let format = WavFormat::stereo(44100);
    assert_eq!(format.channels, 2);
    assert_eq!(format.bits_per_sample, 16);
    assert_eq!(format.block_align(), 4);
    // 44100 frames/sec * 4 bytes/frame
    assert_eq!(format.byte_rate(), 176400);
}

#[test]
fn test_header_layout() {
    let pcm = vec![0u8; 400];
    let wav = write_wav_to_vec(&WavFormat::stereo(48000), &pcm);

    assert_eq!(wav.len(), 444);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 436);
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(u16::from_le_bytes([wav[20], wav[21]]), 1);
    assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 2);
    assert_eq!(
        u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
        48000
    );
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 400);
}

#[test]
fn test_write_wav_matches_vec_writer() {
    let format = WavFormat::stereo(22050);
    let pcm = stereo_to_pcm16(&[0.1, 0.2], &[-0.1, -0.2]);

    let mut streamed = Vec::new();
    write_wav(&mut streamed, &format, &pcm).unwrap();

    assert_eq!(streamed, write_wav_to_vec(&format, &pcm));
}

#[test]
fn test_pcm_interleaves_left_then_right() {
    let pcm = stereo_to_pcm16(&[1.0, 0.0, -0.5], &[-1.0, 0.5, 0.0]);

    assert_eq!(pcm.len(), 12);
    assert_eq!(frame(&pcm, 0), (32767, -32767));
    assert_eq!(frame(&pcm, 1), (0, 16384));
    assert_eq!(frame(&pcm, 2), (-16384, 0));
}

#[test]
fn test_pcm_clips_out_of_range() {
    let pcm = stereo_to_pcm16(&[2.0], &[-7.0]);
    assert_eq!(frame(&pcm, 0), (32767, -32767));
}

#[test]
fn test_pcm_uses_shorter_channel() {
    let pcm = stereo_to_pcm16(&[0.0; 5], &[0.0; 3]);
    assert_eq!(pcm.len(), 12);
}

#[test]
fn test_extract_pcm_roundtrip() {
    let pcm = stereo_to_pcm16(&[0.3; 10], &[-0.3; 10]);
    let wav = write_wav_to_vec(&WavFormat::stereo(44100), &pcm);

    assert_eq!(extract_pcm_data(&wav), Some(pcm.as_slice()));
}

#[test]
fn test_extract_skips_unknown_chunks() {
    let pcm = stereo_to_pcm16(&[0.5; 2], &[0.5; 2]);
    let wav = write_wav_to_vec(&WavFormat::stereo(44100), &pcm);

    // splice an odd-sized LIST chunk (with pad byte) between fmt and data
    let mut spliced = wav[..36].to_vec();
    spliced.extend_from_slice(b"LIST");
    spliced.extend_from_slice(&3u32.to_le_bytes());
    spliced.extend_from_slice(&[1, 2, 3, 0]);
    spliced.extend_from_slice(&wav[36..]);

    assert_eq!(extract_pcm_data(&spliced), Some(pcm.as_slice()));
}

#[test]
fn test_extract_rejects_garbage() {
    assert_eq!(extract_pcm_data(b"RIFF"), None);
    assert_eq!(extract_pcm_data(&[0u8; 64]), None);
}

#[test]
fn test_truncated_data_chunk_rejected() {
    let pcm = stereo_to_pcm16(&[0.5; 8], &[0.5; 8]);
    let wav = write_wav_to_vec(&WavFormat::stereo(44100), &pcm);
    assert_eq!(extract_pcm_data(&wav[..wav.len() - 1]), None);
}

#[test]
fn test_result_hash_matches_file_hash() {
    let x: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin()).collect();
    let y: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).cos()).collect();
    let result = WavResult::from_channels(&x, &y, 44100);

    assert_eq!(result.num_samples, 100);
    assert_eq!(result.pcm_hash.len(), 64);
    assert_eq!(
        compute_pcm_hash(&result.wav_data).as_deref(),
        Some(result.pcm_hash.as_str())
    );
    assert!((result.duration_seconds() - 100.0 / 44100.0).abs() < 1e-12);
}

#[test]
fn test_oversized_data_saturates_size_fields() {
    let bytes = header(&WavFormat::stereo(44100), u32::MAX);
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), u32::MAX);
    assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), u32::MAX);

    let bytes = header(&WavFormat::stereo(44100), 400);
    assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 436);
}
