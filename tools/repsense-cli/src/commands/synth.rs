//! Generate a synthetic squat session.

use std::path::PathBuf;

use repsense_pose_model::frame::FrameStreamHeader;
use repsense_pose_model::synthetic::SquatSession;
use repsense_pose_model::FrameWriter;

pub fn run(session: SquatSession, output: Option<PathBuf>) -> anyhow::Result<()> {
    let header = FrameStreamHeader::now("synthetic", session.frame_rate_hz);
    let frames = session.frames();

    match output {
        Some(path) => {
            let mut writer = FrameWriter::create(&path, &header)
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;
            writer.write_frames(&frames)?;
            let (_, written) = writer.finish()?;
            tracing::info!(
                "Wrote {} frames ({} squats) to {}",
                written,
                session.reps,
                path.display()
            );
        }
        None => {
            let mut writer = FrameWriter::new(std::io::stdout().lock(), &header)?;
            writer.write_frames(&frames)?;
            writer.finish()?;
        }
    }

    Ok(())
}
