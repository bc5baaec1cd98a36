//! Engine configuration as seen from the command line.
//!
//! Values are resolved in order: explicit flags, then the `--config` file,
//! then built-in defaults. Without a config file the `draw` commands use the
//! drawing script defaults (15 s, speed 3, 10 repeats) rather than the
//! library defaults.

use std::path::Path;

use anyhow::{Context, Result};
use scopewave_engine::EngineConfig;

/// Duration used by `draw` when neither a flag nor a config file sets one.
pub const DRAW_DURATION: f64 = 15.0;

/// Speed factor used by `draw` when neither a flag nor a config file sets one.
pub const DRAW_SPEED: f64 = 3.0;

/// Repeat count used by `draw` when neither a flag nor a config file sets one.
pub const DRAW_REPEATS: u32 = 10;

/// Flags that override the render section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOverrides {
    pub duration: Option<f64>,
    pub speed: Option<f64>,
    pub repeats: Option<u32>,
    pub sample_rate: Option<u32>,
    pub seed: Option<u32>,
}

/// Reads `path` if given, otherwise starts from [`EngineConfig::default`].
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path)),
        None => Ok(EngineConfig::default()),
    }
}

/// Configuration for the `draw` and `draw-all` commands.
pub fn draw_config(path: Option<&str>, overrides: &RenderOverrides) -> Result<EngineConfig> {
    let mut config = load_config(path)?;
    if path.is_none() {
        config.render.duration = DRAW_DURATION;
        config.render.speed_factor = DRAW_SPEED;
        config.render.repeats = DRAW_REPEATS;
    }

    if let Some(duration) = overrides.duration {
        config.render.duration = duration;
    }
    if let Some(speed) = overrides.speed {
        config.render.speed_factor = speed;
    }
    if let Some(repeats) = overrides.repeats {
        config.render.repeats = repeats;
    }
    if let Some(sample_rate) = overrides.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(seed) = overrides.seed {
        config.render.seed = seed;
    }

    config.validate().context("Invalid render settings")?;
    Ok(config)
}

/// Configuration for the `tone` and `keymap` commands.
pub fn tone_config(path: Option<&str>, sample_rate: Option<u32>) -> Result<EngineConfig> {
    let mut config = load_config(path)?;
    if let Some(sample_rate) = sample_rate {
        config.sample_rate = sample_rate;
    }
    config.validate().context("Invalid tone settings")?;
    Ok(config)
}
