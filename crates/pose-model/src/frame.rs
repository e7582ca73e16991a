//! Pose frame types for the Repsense keypoint stream.
//!
//! Frames are stored in JSONL format, one frame per line. An optional
//! header is written as the first line, prefixed with `# `.

use serde::{Deserialize, Serialize};

use crate::joint::{Joint, JointReadings};

/// Monotonic timestamp in nanoseconds since tracking start.
pub type TimestampNs = u64;

/// Current frame stream schema version.
pub const FRAME_SCHEMA_VERSION: &str = "1.0";

/// One frame of keypoint readings for a single tracked body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Monotonic nanoseconds since tracking start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Vertical readings per joint; absent joints are omitted.
    #[serde(default)]
    pub joints: JointReadings,
}

/// Metadata describing a recorded frame stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at tracking start (RFC 3339).
    pub epoch_wall: String,

    /// Name of the keypoint source that produced the stream.
    #[serde(default)]
    pub source: String,

    /// Nominal frame rate (Hz).
    pub frame_rate_hz: u32,
}

impl FrameStreamHeader {
    /// Header stamped with the current wall-clock time.
    pub fn now(source: impl Into<String>, frame_rate_hz: u32) -> Self {
        Self {
            schema_version: FRAME_SCHEMA_VERSION.to_string(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
            frame_rate_hz,
        }
    }
}

impl PoseFrame {
    /// Create a frame with no readings.
    pub fn empty(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            joints: JointReadings::default(),
        }
    }

    /// Create a fully populated frame from symmetric left/right readings.
    pub fn symmetric(timestamp_ns: TimestampNs, head: f64, hip: f64, knee: f64, ankle: f64) -> Self {
        Self::empty(timestamp_ns)
            .with(Joint::TopHead, head)
            .with(Joint::LeftHip, hip)
            .with(Joint::RightHip, hip)
            .with(Joint::LeftKnee, knee)
            .with(Joint::RightKnee, knee)
            .with(Joint::LeftAnkle, ankle)
            .with(Joint::RightAnkle, ankle)
    }

    /// Builder-style setter for one joint.
    pub fn with(mut self, joint: Joint, y: f64) -> Self {
        self.joints.set(joint, y);
        self
    }

    /// Builder-style removal of one joint (occlusion).
    pub fn without(mut self, joint: Joint) -> Self {
        self.joints.clear(joint);
        self
    }

    /// Timestamp as fractional seconds since tracking start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }

    /// Usable reading for a joint this frame.
    pub fn reading(&self, joint: Joint) -> Option<f64> {
        self.joints.get(joint)
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<PoseFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Extract the stream header from the first `# ` line, if there is one.
pub fn read_header(jsonl: &str) -> Option<FrameStreamHeader> {
    let first = jsonl.lines().map(str::trim).find(|line| !line.is_empty())?;
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}
