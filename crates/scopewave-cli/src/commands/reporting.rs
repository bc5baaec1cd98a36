use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;

use scopewave_engine::WavResult;

/// Prints `report` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

/// Writes an encoded WAV, creating the parent directory if needed.
pub(crate) fn save_wav(wav: &WavResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    wav.save(path)
        .with_context(|| format!("Failed to write WAV file: {}", path.display()))
}

/// Status lines for a written WAV.
pub(crate) fn print_written(output: &str, duration_seconds: f64, sample_rate: u32, pcm_hash: &str) {
    println!(
        "{} {} ({:.2}s @ {} Hz)",
        "Wrote".green().bold(),
        output,
        duration_seconds,
        sample_rate
    );
    println!("  {} {}", "PCM hash:".dimmed(), pcm_hash);
}
