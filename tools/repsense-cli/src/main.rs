//! Repsense CLI — Command-line interface for squat counting.
//!
//! Usage:
//!   repsense count <PATH>      Replay a frame stream and count squats
//!   repsense synth [OPTIONS]   Generate a synthetic squat session
//!   repsense config            Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use repsense_common::config::OutlierFence;

mod commands;

#[derive(Parser)]
#[command(
    name = "repsense",
    about = "Self-calibrating squat counter for 2D keypoint streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Outlier fence selection on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub enum FenceArg {
    Interquartile,
    FullRange,
}

impl From<FenceArg> for OutlierFence {
    fn from(value: FenceArg) -> Self {
        match value {
            FenceArg::Interquartile => OutlierFence::Interquartile,
            FenceArg::FullRange => OutlierFence::FullRange,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded frame stream through the squat counter
    Count {
        /// Path to the frames JSONL file
        path: PathBuf,

        /// Config file (defaults to the standard location)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Joint smoothing divisor (1 disables smoothing)
        #[arg(long)]
        smooth_factor: Option<f64>,

        /// Fallback threshold for the depth ratio
        #[arg(long)]
        default_threshold: Option<f64>,

        /// Margin subtracted from the adaptive estimate
        #[arg(long)]
        margin: Option<f64>,

        /// Number of top-range gaps retained
        #[arg(long)]
        capacity: Option<usize>,

        /// Outlier fence derivation
        #[arg(long, value_enum)]
        fence: Option<FenceArg>,

        /// Print the session summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a deterministic synthetic squat session
    Synth {
        /// Number of squats
        #[arg(long, default_value = "5")]
        reps: usize,

        /// Frames per squat cycle
        #[arg(long, default_value = "60")]
        frames_per_rep: usize,

        /// Standing frames before the first squat
        #[arg(long, default_value = "0")]
        lead_in: usize,

        /// Nominal frame rate
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Extra hip-knee gap at the bottom of each squat
        #[arg(long, default_value = "0.2")]
        depth: f64,

        /// Multiplier applied to every coordinate
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Peak per-joint noise amplitude
        #[arg(long, default_value = "0.0")]
        jitter: f64,

        /// Drop the left knee every N frames (0 disables)
        #[arg(long, default_value = "0")]
        occlude_every: usize,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Save the effective configuration to the standard location
        #[arg(long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    repsense_common::logging::init_logging(&repsense_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: cli.json_logs,
    });

    match cli.command {
        Commands::Count {
            path,
            config,
            smooth_factor,
            default_threshold,
            margin,
            capacity,
            fence,
            json,
        } => commands::count::run(
            path,
            commands::count::Overrides {
                config,
                smooth_factor,
                default_threshold,
                margin,
                capacity,
                fence: fence.map(Into::into),
            },
            json,
        ),
        Commands::Synth {
            reps,
            frames_per_rep,
            lead_in,
            fps,
            depth,
            scale,
            jitter,
            occlude_every,
            output,
        } => commands::synth::run(
            repsense_pose_model::synthetic::SquatSession {
                reps,
                frames_per_rep,
                lead_in_frames: lead_in,
                frame_rate_hz: fps,
                depth,
                scale,
                jitter,
                occlude_every,
                ..Default::default()
            },
            output,
        ),
        Commands::Config { write } => commands::config::run(write),
    }
}
