//! Media file probing.
//!
//! Probing is delegated to the `ffprobe` CLI; this core only reads the
//! stream layout and duration needed to validate operations (whether an
//! audio track exists, whether a cut range fits the source).

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_json, probe_with_ffprobe};
pub use types::*;
