//! Gaussian dither and hard clipping.
//!
//! Both the path renderer and the tone synthesizer finish through
//! [`dither_and_clip`]; whether any noise is added depends only on the
//! configured standard deviation.

use rand::Rng;

use crate::rng::{create_stage_rng, standard_normal};

/// Adds zero-mean Gaussian noise with the given standard deviation.
pub fn apply_dither<R: Rng + ?Sized>(samples: &mut [f64], std_dev: f64, rng: &mut R) {
    if std_dev <= 0.0 {
        return;
    }
    for sample in samples.iter_mut() {
        *sample += std_dev * standard_normal(rng);
    }
}

/// Clamps every sample to `[-1, 1]`.
pub fn hard_clip(samples: &mut [f64]) {
    for sample in samples.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}

/// Dithers each channel with its own stream, then clips both.
///
/// `stage` names the caller so the renderer and the synthesizer never share
/// a noise sequence for the same seed.
///
/// # Arguments
/// * `x`, `y` - Deflection channels, modified in place
/// * `std_dev` - Dither standard deviation; `0.0` only clips
/// * `seed` - Base seed
/// * `stage` - Caller name mixed into the per-channel seeds
pub fn dither_and_clip(x: &mut [f64], y: &mut [f64], std_dev: f64, seed: u32, stage: &str) {
    if std_dev > 0.0 {
        let mut rng_x = create_stage_rng(seed, &format!("{stage}.x"));
        let mut rng_y = create_stage_rng(seed, &format!("{stage}.y"));
        apply_dither(x, std_dev, &mut rng_x);
        apply_dither(y, std_dev, &mut rng_y);
    }
    hard_clip(x);
    hard_clip(y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_std_is_identity() {
        let mut x = vec![0.25, -0.5, 0.75];
        let mut y = x.clone();
        dither_and_clip(&mut x, &mut y, 0.0, 1, "test");
        assert_eq!(x, vec![0.25, -0.5, 0.75]);
        assert_eq!(y, x);
    }

    #[test]
    fn test_clip_bounds() {
        let mut samples = vec![1.5, -3.0, 0.2, f64::MAX];
        hard_clip(&mut samples);
        assert_eq!(samples, vec![1.0, -1.0, 0.2, 1.0]);
    }

    #[test]
    fn test_channels_get_independent_noise() {
        let mut x = vec![0.0; 64];
        let mut y = vec![0.0; 64];
        dither_and_clip(&mut x, &mut y, 0.01, 9, "test");

        assert_ne!(x, y);
        assert!(x.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn test_dither_is_seeded() {
        let run = |seed| {
            let mut x = vec![0.0; 32];
            let mut y = vec![0.0; 32];
            dither_and_clip(&mut x, &mut y, 0.001, seed, "render");
            (x, y)
        };
        assert_eq!(run(3), run(3));
        assert_ne!(run(3), run(4));
    }
}
