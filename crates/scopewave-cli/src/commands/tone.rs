//! Tone command implementation
//!
//! Synthesizes one harmonic XY tone to a WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use scopewave_engine::{HarmonicToneSynthesizer, ToneSpec};

use super::reporting::{print_json, print_written, save_wav};
use crate::settings::tone_config;

#[derive(Debug, Clone, Serialize)]
pub struct ToneReport {
    pub tone: ToneSpec,
    pub output: String,
    pub samples: usize,
    pub sample_rate: u32,
    pub peak: f64,
    pub pcm_hash: String,
}

/// Run the tone command
///
/// # Arguments
/// * `spec` - Tone to synthesize
/// * `out_path` - WAV file to write
/// * `config_path` - Optional engine config file (JSON)
/// * `sample_rate` - Optional sample rate override
/// * `json_output` - Whether to print a JSON report instead of status lines
pub fn run(
    spec: ToneSpec,
    out_path: &str,
    config_path: Option<&str>,
    sample_rate: Option<u32>,
    json_output: bool,
) -> Result<ExitCode> {
    let config = tone_config(config_path, sample_rate)?;
    let synth = HarmonicToneSynthesizer::from_config(&config);

    let buffer = synth
        .synthesize(&spec)
        .with_context(|| format!("Failed to synthesize tone {}", spec))?;
    let wav = buffer.to_wav();
    save_wav(&wav, Path::new(out_path))?;

    let report = ToneReport {
        tone: spec,
        output: out_path.to_string(),
        samples: buffer.len(),
        sample_rate: wav.sample_rate,
        peak: buffer.peak(),
        pcm_hash: wav.pcm_hash.clone(),
    };

    if json_output {
        print_json(&report)?;
    } else {
        println!("{} {}", "Tone:".cyan().bold(), spec);
        print_written(
            &report.output,
            wav.duration_seconds(),
            report.sample_rate,
            &report.pcm_hash,
        );
    }
    Ok(ExitCode::SUCCESS)
}
