//! Scopewave CLI - render drawings and tones for an oscilloscope in XY mode
//!
//! Every command writes 16-bit stereo WAV files: left channel is horizontal
//! deflection, right channel is vertical deflection.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use scopewave_cli::commands;
use scopewave_cli::logging::init_tracing;
use scopewave_cli::settings::RenderOverrides;
use scopewave_engine::keyboard::DEFAULT_BASE_FREQUENCY;
use scopewave_engine::{PatternKind, ToneSpec};

/// Scopewave - XY oscilloscope audio from SVG drawings and harmonic tones
#[derive(Parser)]
#[command(name = "scopewave")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logs on stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the paths of an SVG file to a WAV file
    Draw {
        /// Path to the SVG file
        #[arg(long)]
        svg: String,

        /// Output WAV file
        #[arg(short, long)]
        out: String,

        #[command(flatten)]
        render: RenderArgs,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render every SVG file under a directory
    DrawAll {
        /// Directory to scan recursively for .svg files
        #[arg(long)]
        svg_dir: String,

        /// Directory receiving one WAV per drawing
        #[arg(long)]
        out_dir: String,

        #[command(flatten)]
        render: RenderArgs,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a harmonic XY tone
    Tone {
        /// Fundamental frequency in Hz
        #[arg(long)]
        freq: f64,

        /// Overtones above the fundamental
        #[arg(long, default_value_t = 3)]
        harmonics: u32,

        /// Length in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f64,

        /// Pattern kind (simple, xy)
        #[arg(long, default_value = "xy")]
        kind: PatternKind,

        /// Output WAV file
        #[arg(short, long)]
        out: String,

        /// Output sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Engine config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render a tone for every keyboard key and write the key mapping
    Keymap {
        /// Directory receiving audio/<key>.wav and keyboard_mapping.json
        #[arg(long)]
        out_dir: String,

        /// Frequency of the first key in Hz
        #[arg(long, default_value_t = DEFAULT_BASE_FREQUENCY)]
        base_freq: f64,

        /// Overtones above the fundamental
        #[arg(long, default_value_t = 3)]
        harmonics: u32,

        /// Length of each tone in seconds
        #[arg(long, default_value_t = 1.0)]
        duration: f64,

        /// Pattern kind (simple, xy)
        #[arg(long, default_value = "xy")]
        kind: PatternKind,

        /// Engine config file (JSON)
        #[arg(long)]
        config: Option<String>,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },
}

/// Render flags shared by `draw` and `draw-all`.
#[derive(clap::Args, Debug, Clone, Default)]
struct RenderArgs {
    /// Output length in seconds [default: 15]
    #[arg(long)]
    duration: Option<f64>,

    /// Loop traversals per repetition [default: 3]
    #[arg(long)]
    speed: Option<f64>,

    /// Number of repetitions [default: 10]
    #[arg(long)]
    repeats: Option<u32>,

    /// Output sample rate in Hz [default: 44100]
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Dither seed
    #[arg(long)]
    seed: Option<u32>,

    /// Engine config file (JSON)
    #[arg(long)]
    config: Option<String>,
}

impl RenderArgs {
    fn overrides(&self) -> RenderOverrides {
        RenderOverrides {
            duration: self.duration,
            speed: self.speed,
            repeats: self.repeats,
            sample_rate: self.sample_rate,
            seed: self.seed,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Draw {
            svg,
            out,
            render,
            json,
        } => commands::draw::run(&svg, &out, render.config.as_deref(), &render.overrides(), json),
        Commands::DrawAll {
            svg_dir,
            out_dir,
            render,
            json,
        } => commands::draw_all::run(
            &svg_dir,
            &out_dir,
            render.config.as_deref(),
            &render.overrides(),
            json,
        ),
        Commands::Tone {
            freq,
            harmonics,
            duration,
            kind,
            out,
            sample_rate,
            config,
            json,
        } => commands::tone::run(
            ToneSpec::new(freq, harmonics, duration, kind),
            &out,
            config.as_deref(),
            sample_rate,
            json,
        ),
        Commands::Keymap {
            out_dir,
            base_freq,
            harmonics,
            duration,
            kind,
            config,
            json,
        } => commands::keymap::run(
            &out_dir,
            base_freq,
            harmonics,
            duration,
            kind,
            config.as_deref(),
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
