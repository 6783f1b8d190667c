//! # clipforge-av
//!
//! Validated media operations delegated to an external engine.
//!
//! This crate provides:
//! - A [`MediaOperation`] data model covering cutting, concatenation, audio
//!   track muxing and extraction, audio slicing, and speed changes
//! - A [`Dispatcher`] that validates an operation and routes it to its action
//! - The [`MediaEngine`] seam and its ffmpeg/ffprobe implementation
//!
//! Parameters are checked before any file is read, and outputs are staged in
//! a [`Workspace`] so a failed run never leaves a partial file behind.
//!
//! ## Example
//!
//! ```no_run
//! use clipforge_av::{Dispatcher, FfmpegEngine, MediaOperation};
//!
//! let engine = FfmpegEngine::locate(None, None)?;
//! let dispatcher = Dispatcher::new(engine);
//! let outcome = dispatcher.execute(&MediaOperation::Cut {
//!     input: "Elon.mp4".into(),
//!     start: 0.5,
//!     end: 846.0,
//!     output: "out.mp4".into(),
//! })?;
//! println!("{} wrote {}", outcome.operation, outcome.output.display());
//! # Ok::<(), clipforge_av::Error>(())
//! ```

pub mod actions;
pub mod command;
mod dispatch;
pub mod engine;
mod error;
pub mod ffmpeg;
pub mod operation;
pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use actions::ActionOptions;
pub use command::{ToolCommand, ToolOutput};
pub use dispatch::{Dispatcher, Outcome};
pub use engine::{FfmpegEngine, MediaEngine};
pub use error::{Error, Result};
pub use operation::{
    ClockRange, ClockTime, FactorRange, MediaOperation, SpeedDirection, SpeedFactor,
    StreamLayout, TimeRange, DEFAULT_SLOW_DOWN, DEFAULT_SPEED_UP,
};
pub use probe::{AudioTrack, MediaInfo, VideoTrack};
pub use tools::{check_configured_tools, check_tool, check_tools, require_tool, ToolInfo};
pub use workspace::Workspace;
