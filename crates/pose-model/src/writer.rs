//! Streaming JSONL frame writer.
//!
//! The header goes out as a `# {json}` comment line, followed by one frame
//! object per line. JSON has no encoding for NaN or infinity, so a frame
//! carrying a non-finite reading is rejected instead of being written with
//! a `null` that would later read back as a missing joint.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use repsense_common::error::{RepsenseError, RepsenseResult};

use crate::frame::{FrameStreamHeader, PoseFrame};

/// Writes a frame stream to any `Write` sink.
pub struct FrameWriter<W: Write> {
    out: W,
    frames: u64,
    last_timestamp_ns: Option<u64>,
}

impl FrameWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write the header to it.
    pub fn create(path: &Path, header: &FrameStreamHeader) -> RepsenseResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::new(BufWriter::new(File::create(path)?), header)
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(mut out: W, header: &FrameStreamHeader) -> RepsenseResult<Self> {
        out.write_all(b"# ")?;
        serde_json::to_writer(&mut out, header)?;
        out.write_all(b"\n")?;
        Ok(Self {
            out,
            frames: 0,
            last_timestamp_ns: None,
        })
    }

    /// Append one frame.
    ///
    /// Fails with `RepsenseError::Frame` when a present reading is not
    /// finite. Timestamps that go backwards are written but logged.
    pub fn write_frame(&mut self, frame: &PoseFrame) -> RepsenseResult<()> {
        if let Some(joint) = frame.joints.first_non_finite() {
            return Err(RepsenseError::frame(format!(
                "frame at t={} has a non-finite {joint} reading",
                frame.timestamp_ns
            )));
        }
        if let Some(prev) = self.last_timestamp_ns.filter(|prev| *prev > frame.timestamp_ns) {
            tracing::warn!(prev, t = frame.timestamp_ns, "frame timestamp went backwards");
        }

        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.frames += 1;
        self.last_timestamp_ns = Some(frame.timestamp_ns);
        Ok(())
    }

    pub fn write_frames<'a>(
        &mut self,
        frames: impl IntoIterator<Item = &'a PoseFrame>,
    ) -> RepsenseResult<()> {
        frames
            .into_iter()
            .try_for_each(|frame| self.write_frame(frame))
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Flush and hand back the underlying writer with the frame count.
    pub fn finish(mut self) -> RepsenseResult<(W, u64)> {
        self.out.flush()?;
        Ok((self.out, self.frames))
    }
}
