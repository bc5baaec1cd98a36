//! Keymap command implementation
//!
//! Renders one tone per keyboard key and writes the key-to-file manifest
//! consumed by the browser player.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use scopewave_engine::keyboard::KeyLayout;
use scopewave_engine::{HarmonicToneSynthesizer, MemoryToneCache, PatternKind, ToneCache};

use super::reporting::{print_json, save_wav};
use crate::settings::tone_config;

/// Manifest file name, relative to the output directory.
pub const MAPPING_FILE: &str = "keyboard_mapping.json";

/// Subdirectory holding the rendered keys.
pub const AUDIO_DIR: &str = "audio";

/// Key to audio file, serialized as a JSON object in layout order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMapping(pub Vec<(String, String)>);

impl Serialize for KeyMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, file) in &self.0 {
            map.serialize_entry(key, file)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyReport {
    pub key: String,
    pub frequency: f64,
    pub file: String,
    pub pcm_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeymapReport {
    pub mapping_file: String,
    pub keys: Vec<KeyReport>,
}

/// Run the keymap command
///
/// # Arguments
/// * `out_dir` - Directory receiving `audio/<key>.wav` and the manifest
/// * `base_freq` - Frequency of the first key in Hz
/// * `harmonics` - Overtones per tone
/// * `duration` - Tone length in seconds
/// * `kind` - Pattern kind for every key
/// * `config_path` - Optional engine config file (JSON)
/// * `json_output` - Whether to print a JSON report instead of status lines
pub fn run(
    out_dir: &str,
    base_freq: f64,
    harmonics: u32,
    duration: f64,
    kind: PatternKind,
    config_path: Option<&str>,
    json_output: bool,
) -> Result<ExitCode> {
    let config = tone_config(config_path, None)?;
    let layout = KeyLayout::qwerty(base_freq, harmonics, duration, kind)
        .context("Invalid keyboard layout")?;
    let cache = MemoryToneCache::new(HarmonicToneSynthesizer::from_config(&config));

    let out_root = Path::new(out_dir);
    let audio_root = out_root.join(AUDIO_DIR);
    fs::create_dir_all(&audio_root)
        .with_context(|| format!("Failed to create output directory: {}", audio_root.display()))?;

    if !json_output {
        println!("{} {}", "Output directory:".blue().bold(), out_dir);
        println!(
            "{} {} keys from {:.2} Hz",
            "Layout:".dimmed(),
            layout.keys().len(),
            layout.base_frequency()
        );
    }

    let mut mapping = KeyMapping::default();
    let mut keys = Vec::with_capacity(layout.keys().len());
    for (key, spec) in layout.tones() {
        let buffer = cache
            .get_or_create(&spec)
            .with_context(|| format!("Failed to synthesize key {}", key))?;
        let wav = buffer.to_wav();
        let file_name = format!("{}.wav", key);
        save_wav(&wav, &audio_root.join(&file_name))?;

        let relative = format!("{}/{}", AUDIO_DIR, file_name);
        if !json_output {
            println!("  {} {} {:.2} Hz", "OK".green(), key, spec.frequency);
        }
        mapping.0.push((key.to_string(), relative.clone()));
        keys.push(KeyReport {
            key: key.to_string(),
            frequency: spec.frequency,
            file: relative,
            pcm_hash: wav.pcm_hash,
        });
    }

    let mapping_path = out_root.join(MAPPING_FILE);
    let mapping_json =
        serde_json::to_string_pretty(&mapping).context("Failed to serialize key mapping")?;
    fs::write(&mapping_path, mapping_json)
        .with_context(|| format!("Failed to write key mapping: {}", mapping_path.display()))?;

    if json_output {
        print_json(&KeymapReport {
            mapping_file: mapping_path.display().to_string(),
            keys,
        })?;
    } else {
        println!(
            "{} {} ({} keys)",
            "Wrote".green().bold(),
            mapping_path.display(),
            keys.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}
