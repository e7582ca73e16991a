//! Replay a frame stream through the squat counter.

use std::path::PathBuf;

use repsense_common::config::{AppConfig, OutlierFence};
use repsense_pose_model::frame::{parse_frames, read_header};
use repsense_rep_core::sink::OutputSink;
use repsense_rep_core::SquatPipeline;

/// Command-line adjustments applied on top of the loaded config.
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub smooth_factor: Option<f64>,
    pub default_threshold: Option<f64>,
    pub margin: Option<f64>,
    pub capacity: Option<usize>,
    pub fence: Option<OutlierFence>,
}

impl Overrides {
    fn resolve(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)
                .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
            None => AppConfig::load(),
        };

        let detector = &mut config.detector;
        if let Some(v) = self.smooth_factor {
            detector.smooth_factor = v;
        }
        if let Some(v) = self.default_threshold {
            detector.default_threshold = v;
        }
        if let Some(v) = self.margin {
            detector.margin = v;
        }
        if let Some(v) = self.capacity {
            detector.buffer_capacity = v;
        }
        if let Some(v) = self.fence {
            detector.outlier_fence = v;
        }
        Ok(config)
    }
}

/// Prints the counter text to stdout and log lines through tracing.
struct ConsoleSink {
    print_text: bool,
}

impl OutputSink for ConsoleSink {
    fn set_text(&mut self, text: &str) {
        if self.print_text {
            println!("{text}");
        }
    }

    fn log_line(&mut self, line: &str) {
        tracing::info!("{line}");
    }
}

pub fn run(path: PathBuf, overrides: Overrides, json: bool) -> anyhow::Result<()> {
    let config = overrides.resolve()?;

    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read frames {}: {e}", path.display()))?;

    if let Some(header) = read_header(&content) {
        tracing::info!(
            source = %header.source,
            fps = header.frame_rate_hz,
            started = %header.epoch_wall,
            "frame stream header"
        );
    }

    let frames =
        parse_frames(&content).map_err(|e| anyhow::anyhow!("Failed to parse frames: {e}"))?;
    tracing::info!("Loaded {} frames from {}", frames.len(), path.display());

    let mut pipeline = SquatPipeline::new(&config.detector, ConsoleSink { print_text: !json })
        .map_err(|e| anyhow::anyhow!("Invalid detector config: {e}"))?;
    pipeline.process_all(&frames);

    let summary = pipeline.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\nSession summary:");
        println!("  Frames:      {}", summary.frames);
        println!("  Evaluated:   {}", summary.evaluated);
        println!("  Incomplete:  {}", summary.incomplete);
        println!("  Degenerate:  {}", summary.degenerate);
        println!("  Held joints: {}", summary.held);
        println!(
            "  Threshold:   {:.4}{}",
            summary.threshold,
            if summary.threshold_is_fallback {
                " (default)"
            } else {
                ""
            }
        );
        println!("  Squats:      {}", summary.reps);
    }

    Ok(())
}
