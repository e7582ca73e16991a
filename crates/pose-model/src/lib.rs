//! Repsense Pose Model
//!
//! Defines the data contracts for keypoint streams:
//! - **Joints:** The seven tracked body joints and their vertical readings
//! - **Frames:** Timestamped per-frame readings, absent joints included
//! - **Streams:** JSONL frame files with a commented header line
//! - **Synthetic:** Deterministic squat sessions for tests and demos
//!
//! Coordinates are opaque scalars in the keypoint source's own unit. Only
//! the vertical component is carried.

pub mod frame;
pub mod joint;
pub mod synthetic;
pub mod writer;

pub use frame::*;
pub use joint::*;
pub use writer::FrameWriter;
