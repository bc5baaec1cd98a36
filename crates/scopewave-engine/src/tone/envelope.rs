//! Linear fade-in and fade-out.

/// Gain at sample `index` of `len` for a fade of `fade_samples` per end.
///
/// Rises linearly from 0 at the first sample, falls linearly to 0 at the
/// last, and is 1 in between. When the fades would overlap each is
/// shortened to half the buffer.
pub fn fade_gain(index: usize, len: usize, fade_samples: usize) -> f64 {
    let fade = fade_samples.min(len / 2);
    if fade == 0 || index >= len {
        return 1.0;
    }
    let from_start = index as f64 / fade as f64;
    let from_end = (len - 1 - index) as f64 / fade as f64;
    from_start.min(from_end).min(1.0)
}

/// Multiplies a channel by the fade envelope.
pub fn apply_fades(samples: &mut [f64], fade_samples: usize) {
    let len = samples.len();
    for (i, sample) in samples.iter_mut().enumerate() {
        *sample *= fade_gain(i, len, fade_samples);
    }
}
