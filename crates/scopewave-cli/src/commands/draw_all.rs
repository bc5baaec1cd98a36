//! Draw-all command implementation
//!
//! Renders every SVG file under a directory, one WAV per drawing, and keeps
//! going past individual failures.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use walkdir::WalkDir;

use super::draw::{draw_file, DrawReport};
use super::reporting::print_json;
use crate::settings::{draw_config, RenderOverrides};

/// Outcome for one SVG file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub svg: String,
    pub success: bool,
    /// Error chain if rendering failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DrawReport>,
}

/// Summary for a whole directory
#[derive(Debug, Clone, Serialize)]
pub struct DrawAllSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub runtime_seconds: f64,
    pub files: Vec<FileResult>,
}

/// Run the draw-all command
///
/// # Returns
/// Exit code: 0 if every file rendered, 1 if any failed
pub fn run(
    svg_dir: &str,
    out_dir: &str,
    config_path: Option<&str>,
    overrides: &RenderOverrides,
    json_output: bool,
) -> Result<ExitCode> {
    let start = Instant::now();
    let svg_root = Path::new(svg_dir);
    let out_root = Path::new(out_dir);

    if !svg_root.is_dir() {
        anyhow::bail!("SVG directory does not exist: {}", svg_dir);
    }
    let config = draw_config(config_path, overrides)?;
    fs::create_dir_all(out_root)
        .with_context(|| format!("Failed to create output directory: {}", out_dir))?;

    let svg_files = collect_svg_files(svg_root);
    if !json_output {
        println!("{} {}", "SVG directory:".blue().bold(), svg_dir);
        println!("{} {}", "Output directory:".blue().bold(), out_dir);
        println!(
            "{} Found {} SVG files to process",
            "INFO".blue().bold(),
            svg_files.len()
        );
    }
    if svg_files.is_empty() {
        tracing::warn!(dir = svg_dir, "no SVG files found");
    }

    let mut files = Vec::with_capacity(svg_files.len());
    for svg_file in &svg_files {
        let out_file = output_path(svg_root, svg_file, out_root);
        let result = match draw_file(svg_file, &out_file, &config) {
            Ok(report) => {
                if !json_output {
                    println!("  {} {}", "OK".green(), report.output);
                }
                FileResult {
                    svg: svg_file.display().to_string(),
                    success: true,
                    error: None,
                    report: Some(report),
                }
            }
            Err(e) => {
                let error = format!("{:#}", e);
                if !json_output {
                    println!("  {} {} - {}", "FAILED".red(), svg_file.display(), error);
                }
                FileResult {
                    svg: svg_file.display().to_string(),
                    success: false,
                    error: Some(error),
                    report: None,
                }
            }
        };
        files.push(result);
    }

    let successful = files.iter().filter(|f| f.success).count();
    let summary = DrawAllSummary {
        total: files.len(),
        successful,
        failed: files.len() - successful,
        runtime_seconds: start.elapsed().as_secs_f64(),
        files,
    };

    if json_output {
        print_json(&summary)?;
    } else {
        println!();
        println!("{} {}", "Total:".blue().bold(), summary.total);
        println!("{} {}", "Successful:".green().bold(), summary.successful);
        println!("{} {}", "Failed:".red().bold(), summary.failed);
        println!(
            "{} {:.2}s",
            "Total runtime:".blue().bold(),
            summary.runtime_seconds
        );
    }

    if summary.failed > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Every `.svg` file under `root`, sorted for a stable order.
fn collect_svg_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        })
        .collect();
    files.sort();
    files
}

/// Mirrors the file's place under `svg_root` into `out_root`, as `.wav`.
fn output_path(svg_root: &Path, svg_file: &Path, out_root: &Path) -> PathBuf {
    let relative = svg_file.strip_prefix(svg_root).unwrap_or(svg_file);
    out_root.join(relative).with_extension("wav")
}
