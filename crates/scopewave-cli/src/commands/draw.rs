//! Draw command implementation
//!
//! Renders the paths of one SVG file to an XY WAV file.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use scopewave_engine::{render_paths, svg, EngineConfig};

use super::reporting::{print_json, print_written, save_wav};
use crate::settings::{draw_config, RenderOverrides};

/// What a single drawing produced.
#[derive(Debug, Clone, Serialize)]
pub struct DrawReport {
    /// Source SVG file
    pub svg: String,
    /// Written WAV file
    pub output: String,
    /// Number of contours found in the SVG
    pub contours: usize,
    /// Samples per channel
    pub samples: usize,
    pub sample_rate: u32,
    pub duration_seconds: f64,
    /// BLAKE3 hash of the PCM data
    pub pcm_hash: String,
}

/// Run the draw command
///
/// # Arguments
/// * `svg_path` - SVG file to read
/// * `out_path` - WAV file to write
/// * `config_path` - Optional engine config file (JSON)
/// * `overrides` - Render flags given on the command line
/// * `json_output` - Whether to print a JSON report instead of status lines
pub fn run(
    svg_path: &str,
    out_path: &str,
    config_path: Option<&str>,
    overrides: &RenderOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let config = draw_config(config_path, overrides)?;

    if !json_output {
        println!("{} {}", "Drawing:".cyan().bold(), svg_path);
        println!(
            "{} {}s, speed {}, {} repeats",
            "Render:".dimmed(),
            config.render.duration,
            config.render.speed_factor,
            config.render.repeats
        );
    }

    let report = draw_file(Path::new(svg_path), Path::new(out_path), &config)?;

    if json_output {
        print_json(&report)?;
    } else {
        println!(
            "{} {} contour(s), {} samples",
            "Rendered".green().bold(),
            report.contours,
            report.samples
        );
        print_written(
            &report.output,
            report.duration_seconds,
            report.sample_rate,
            &report.pcm_hash,
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Loads, renders and writes one SVG file.
pub fn draw_file(svg_path: &Path, out_path: &Path, config: &EngineConfig) -> Result<DrawReport> {
    let document = fs::read_to_string(svg_path)
        .with_context(|| format!("Failed to read SVG file: {}", svg_path.display()))?;
    let paths = svg::load_svg_str(&document)
        .with_context(|| format!("Failed to parse SVG file: {}", svg_path.display()))?;
    let buffer = render_paths(&paths, config)
        .with_context(|| format!("Failed to render SVG file: {}", svg_path.display()))?;

    let wav = buffer.to_wav();
    save_wav(&wav, out_path)?;
    tracing::debug!(output = %out_path.display(), "saved drawing");

    Ok(DrawReport {
        svg: svg_path.display().to_string(),
        output: out_path.display().to_string(),
        contours: paths.len(),
        samples: buffer.len(),
        sample_rate: wav.sample_rate,
        duration_seconds: wav.duration_seconds(),
        pcm_hash: wav.pcm_hash,
    })
}
