//! Repsense Rep Core
//!
//! Turns a noisy stream of joint positions into a squat rep count:
//! - **Smoothing:** Heavily damped exponential filter per joint
//! - **Ratio:** Hip-knee gap normalized by head-ankle span
//! - **Adaptive Threshold:** Top-range tracking with outlier replacement
//! - **Counter:** Edge-triggered state machine that emits each new rep
//!
//! This crate is pure computation. Frames go in; outcomes come out, and
//! new counts are written to an [`OutputSink`].

pub mod counter;
pub mod pipeline;
pub mod ratio;
pub mod sink;
pub mod smoother;
pub mod threshold;

pub use counter::{SquatState, SquatStateMachine};
pub use pipeline::{FrameOutcome, SessionSummary, SquatPipeline};
pub use ratio::DerivedMetrics;
pub use sink::{MemorySink, OutputSink, TracingSink};
pub use smoother::JointSmoother;
pub use threshold::AdaptiveThreshold;
