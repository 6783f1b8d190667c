//! Media operations.
//!
//! One function per operation kind:
//! - Cutting a time range out of a video
//! - Container-aware concatenation and raw audio byte concatenation
//! - Audio track muxing, extraction, and removal
//! - Audio slicing by `m:ss` marks
//! - Video and audio speed changes
//!
//! Every function validates its parameters and input files before the engine
//! is touched, stages the output in a [`Workspace`], and only moves it to the
//! destination once the engine reports success.

mod audio;
mod concat;
mod cut;
mod speed;
mod tracks;

pub use audio::{audio_concatenate, audio_slice};
pub use concat::concatenate;
pub use cut::cut;
pub use speed::{audio_speed, change_speed};
pub use tracks::{add_audio, extract_audio, extract_silent_video};

use crate::{Error, MediaEngine, Result, Workspace};
use std::path::{Path, PathBuf};

/// Frame rate used when re-timing a silent video.
pub const DEFAULT_SLOW_FRAME_RATE: u32 = 16;

/// Settings shared by all operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOptions {
    /// Replace an existing output file instead of failing.
    pub overwrite: bool,
    /// Output frame rate for silent-video speed changes.
    pub slow_frame_rate: u32,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            slow_frame_rate: DEFAULT_SLOW_FRAME_RATE,
        }
    }
}

impl ActionOptions {
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn slow_frame_rate(mut self, fps: u32) -> Self {
        self.slow_frame_rate = fps;
        self
    }
}

/// Fail with `FileNotFound` for the first input that does not exist.
fn require_inputs<'a>(inputs: impl IntoIterator<Item = &'a Path>) -> Result<()> {
    for input in inputs {
        if !input.is_file() {
            return Err(Error::file_not_found(input));
        }
    }
    Ok(())
}

/// Check the destination and open a staging workspace for it.
fn prepare_output(output: &Path, options: &ActionOptions) -> Result<Workspace> {
    if output.exists() && !options.overwrite {
        return Err(Error::InvalidInput(format!(
            "Output file already exists: {:?}",
            output
        )));
    }
    Workspace::new(output)
}

/// Run one engine invocation into the workspace and publish the result.
fn run_engine(
    engine: &dyn MediaEngine,
    workspace: Workspace,
    args: Vec<String>,
    options: &ActionOptions,
) -> Result<PathBuf> {
    engine.transcode(&args)?;
    let output = workspace.finalize(options.overwrite)?;

    tracing::info!("Wrote {:?}", output);
    Ok(output)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_input_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");
        let err = require_inputs([missing.as_path()]).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { ref path } if *path == missing));
    }

    #[test]
    fn existing_output_needs_overwrite() {
        let dir = tempdir().unwrap();
        let out = touch(dir.path(), "out.mp4");
        assert!(matches!(
            prepare_output(&out, &ActionOptions::default()),
            Err(Error::InvalidInput(_))
        ));
        assert!(prepare_output(&out, &ActionOptions::default().overwrite(true)).is_ok());
    }

    #[test]
    fn engine_failure_leaves_no_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.mp4");
        let engine = RecordingEngine::default().failing("Invalid data found");
        let workspace = prepare_output(&out, &ActionOptions::default()).unwrap();
        let args = vec![
            "-i".to_string(),
            "in.mp4".to_string(),
            workspace.output().to_string_lossy().into_owned(),
        ];

        let err = run_engine(&engine, workspace, args, &ActionOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Engine { .. }));
        assert!(!out.exists());
        // Staging directory is gone too.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
