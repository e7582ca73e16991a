//! Frame-by-frame squat counting pipeline.
//!
//! Each frame runs, in order: smooth joints, derive gap and span, feed
//! the gap to the threshold estimator, then compare the ratio against
//! the threshold the estimator reports for that same frame.

use serde::Serialize;

use repsense_common::config::DetectorConfig;
use repsense_common::error::RepsenseResult;
use repsense_pose_model::{Joint, PoseFrame};

use crate::counter::{emit_rep, SquatState, SquatStateMachine};
use crate::ratio::DerivedMetrics;
use crate::sink::{OutputSink, TracingSink};
use crate::smoother::JointSmoother;
use crate::threshold::AdaptiveThreshold;

/// Result of processing a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Some joints have never been reported, so no metrics exist yet.
    Incomplete { missing: Vec<Joint> },
    /// The span was non-positive or the ratio was not finite. The counter
    /// state is unchanged.
    Degenerate { metrics: DerivedMetrics },
    /// The ratio was compared against the threshold.
    Evaluated {
        ratio: f64,
        threshold: f64,
        state: SquatState,
        /// New total when this frame started a rep.
        rep: Option<u64>,
    },
}

impl FrameOutcome {
    pub fn rep(&self) -> Option<u64> {
        match self {
            FrameOutcome::Evaluated { rep, .. } => *rep,
            _ => None,
        }
    }
}

/// Running totals for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Frames handed to the pipeline.
    pub frames: u64,
    /// Frames whose ratio was compared against the threshold.
    pub evaluated: u64,
    /// Frames skipped for degenerate geometry.
    pub degenerate: u64,
    /// Frames skipped because a joint had never been seen.
    pub incomplete: u64,
    /// Evaluated frames that used at least one held joint value.
    pub held: u64,
    /// Reps counted so far.
    pub reps: u64,
    /// Threshold in effect after the last frame.
    pub threshold: f64,
    /// Whether that threshold is the fallback default.
    pub threshold_is_fallback: bool,
}

/// Owns every component of the counter and drives them per frame.
pub struct SquatPipeline<S: OutputSink = TracingSink> {
    smoother: JointSmoother,
    threshold: AdaptiveThreshold,
    machine: SquatStateMachine,
    sink: S,
    summary: SessionSummary,
}

impl SquatPipeline<TracingSink> {
    /// Pipeline with default tuning that logs reps through `tracing`.
    pub fn with_defaults() -> Self {
        Self::build(&DetectorConfig::default(), TracingSink::new())
    }
}

impl<S: OutputSink> SquatPipeline<S> {
    /// Create a pipeline after validating `config`.
    pub fn new(config: &DetectorConfig, sink: S) -> RepsenseResult<Self> {
        config.validate()?;
        tracing::debug!(?config, "squat pipeline configured");
        Ok(Self::build(config, sink))
    }

    fn build(config: &DetectorConfig, sink: S) -> Self {
        Self {
            smoother: JointSmoother::new(config.smooth_factor),
            threshold: AdaptiveThreshold::new(config),
            machine: SquatStateMachine::new(),
            sink,
            summary: SessionSummary::default(),
        }
    }

    /// Process one frame from the keypoint source.
    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        self.summary.frames += 1;
        self.smoother.update_frame(&frame.joints);

        let Some(pose) = self.smoother.snapshot() else {
            let missing: Vec<Joint> = Joint::ALL
                .into_iter()
                .filter(|joint| self.smoother.value(*joint).is_none())
                .collect();
            tracing::trace!(t = frame.timestamp_ns, ?missing, "frame incomplete");
            self.summary.incomplete += 1;
            return FrameOutcome::Incomplete { missing };
        };

        if !frame.joints.is_complete() {
            tracing::trace!(
                t = frame.timestamp_ns,
                missing = ?frame.joints.missing(),
                "holding smoothed values for missing joints"
            );
            self.summary.held += 1;
        }

        self.evaluate(DerivedMetrics::from_pose(&pose))
    }

    /// Process precomputed metrics, bypassing the smoother.
    pub fn process_metrics(&mut self, metrics: DerivedMetrics) -> FrameOutcome {
        self.summary.frames += 1;
        self.evaluate(metrics)
    }

    fn evaluate(&mut self, metrics: DerivedMetrics) -> FrameOutcome {
        if let Some(gap) = metrics.usable_gap() {
            self.threshold.observe(gap);
        }

        let Some(ratio) = metrics.ratio() else {
            tracing::debug!(
                gap = metrics.hip_knee_gap,
                span = metrics.head_ankle_span,
                "degenerate geometry, skipping transition"
            );
            self.summary.degenerate += 1;
            return FrameOutcome::Degenerate { metrics };
        };

        let threshold = self.threshold.current_threshold();
        let rep = self.machine.step(ratio, threshold);
        if let Some(total) = rep {
            emit_rep(&mut self.sink, total);
        }
        self.summary.evaluated += 1;

        tracing::trace!(ratio, threshold, state = ?self.machine.state(), "frame evaluated");

        FrameOutcome::Evaluated {
            ratio,
            threshold,
            state: self.machine.state(),
            rep,
        }
    }

    /// Process a batch of frames, returning the reps counted during it.
    pub fn process_all<'a>(&mut self, frames: impl IntoIterator<Item = &'a PoseFrame>) -> u64 {
        let before = self.machine.reps();
        for frame in frames {
            self.process_frame(frame);
        }
        self.machine.reps() - before
    }

    pub fn reps(&self) -> u64 {
        self.machine.reps()
    }

    pub fn state(&self) -> SquatState {
        self.machine.state()
    }

    pub fn current_threshold(&self) -> f64 {
        self.threshold.current_threshold()
    }

    pub fn estimator(&self) -> &AdaptiveThreshold {
        &self.threshold
    }

    pub fn smoother(&self) -> &JointSmoother {
        &self.smoother
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            reps: self.machine.reps(),
            threshold: self.threshold.current_threshold(),
            threshold_is_fallback: self.threshold.is_fallback(),
            ..self.summary.clone()
        }
    }
}
