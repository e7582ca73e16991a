//! Deterministic synthetic squat sessions.
//!
//! Each rep is one cosine cycle of the hip dropping toward the knees and
//! returning, starting and ending at the standing pose. Head and ankles
//! stay fixed so the body-height span is constant.

use std::f64::consts::TAU;

use crate::frame::{PoseFrame, TimestampNs};
use crate::joint::Joint;

/// Parameters for a generated session.
#[derive(Debug, Clone)]
pub struct SquatSession {
    /// Number of full squat cycles.
    pub reps: usize,

    /// Frames per squat cycle.
    pub frames_per_rep: usize,

    /// Standing frames emitted before the first rep.
    pub lead_in_frames: usize,

    /// Nominal frame rate (Hz), used for timestamps.
    pub frame_rate_hz: u32,

    /// Hip-knee gap while standing.
    pub standing_gap: f64,

    /// Additional hip-knee gap at the bottom of a squat.
    pub depth: f64,

    /// Multiplier applied to every coordinate.
    pub scale: f64,

    /// Peak amplitude of per-joint deterministic noise.
    pub jitter: f64,

    /// Drop the left knee reading on every Nth frame (0 disables).
    pub occlude_every: usize,
}

impl Default for SquatSession {
    fn default() -> Self {
        Self {
            reps: 5,
            frames_per_rep: 60,
            lead_in_frames: 0,
            frame_rate_hz: 30,
            standing_gap: 0.05,
            depth: 0.2,
            scale: 1.0,
            jitter: 0.0,
            occlude_every: 0,
        }
    }
}

const HEAD_Y: f64 = 0.0;
const HIP_Y: f64 = 0.5;
const ANKLE_Y: f64 = 1.0;

impl SquatSession {
    /// Total number of frames the session produces.
    pub fn frame_count(&self) -> usize {
        self.lead_in_frames + self.reps * self.frames_per_rep
    }

    /// Hip-knee gap (before scaling and noise) at frame `index`.
    pub fn gap_at(&self, index: usize) -> f64 {
        if index < self.lead_in_frames || self.frames_per_rep == 0 {
            return self.standing_gap;
        }
        let phase = (index - self.lead_in_frames) % self.frames_per_rep;
        let progress = phase as f64 / self.frames_per_rep as f64;
        self.standing_gap + self.depth * (1.0 - (TAU * progress).cos()) / 2.0
    }

    /// Generate every frame of the session.
    pub fn frames(&self) -> Vec<PoseFrame> {
        (0..self.frame_count()).map(|i| self.frame_at(i)).collect()
    }

    /// Generate the frame at `index`.
    pub fn frame_at(&self, index: usize) -> PoseFrame {
        let knee = HIP_Y + self.gap_at(index);
        let mut frame = PoseFrame::empty(self.timestamp_at(index));
        for joint in Joint::ALL {
            let base = match joint {
                Joint::TopHead => HEAD_Y,
                Joint::LeftHip | Joint::RightHip => HIP_Y,
                Joint::LeftKnee | Joint::RightKnee => knee,
                Joint::LeftAnkle | Joint::RightAnkle => ANKLE_Y,
            };
            let y = (base + self.jitter * noise(index, joint)) * self.scale;
            frame.joints.set(joint, y);
        }
        if self.occlude_every > 0 && index > 0 && index % self.occlude_every == 0 {
            frame.joints.clear(Joint::LeftKnee);
        }
        frame
    }

    fn timestamp_at(&self, index: usize) -> TimestampNs {
        let rate = u64::from(self.frame_rate_hz.max(1));
        index as u64 * 1_000_000_000 / rate
    }
}

/// Hash-style noise in `[-1, 1]`, stable for a given frame and joint.
fn noise(index: usize, joint: Joint) -> f64 {
    let seed = index as f64 * 12.9898 + joint.index() as f64 * 78.233;
    let value = (seed.sin() * 43_758.545_3).fract();
    value.clamp(-1.0, 1.0)
}
