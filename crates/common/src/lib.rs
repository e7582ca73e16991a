//! Repsense Common Utilities
//!
//! Shared infrastructure for all Repsense crates:
//! - Error types and result aliases
//! - Detector and logging configuration
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
