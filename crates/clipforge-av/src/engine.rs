//! The external media engine seam.

use crate::probe::{probe_with_ffprobe, MediaInfo};
use crate::tools::get_tool_path;
use crate::{Result, ToolCommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Capabilities the dispatcher needs from a media engine.
///
/// Implementations must report failure through the returned `Result`; a
/// launched process is not a successful one until it exits cleanly.
pub trait MediaEngine {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Inspect a file's streams and duration.
    fn probe(&self, path: &Path) -> Result<MediaInfo>;

    /// Run one transcoder invocation with the given argument tokens.
    fn transcode(&self, args: &[String]) -> Result<()>;
}

impl<E: MediaEngine + ?Sized> MediaEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        (**self).probe(path)
    }

    fn transcode(&self, args: &[String]) -> Result<()> {
        (**self).transcode(args)
    }
}

/// [`MediaEngine`] backed by the `ffmpeg` and `ffprobe` executables.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegEngine {
    /// Use explicit executable paths.
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            timeout: None,
        }
    }

    /// Resolve both tools, preferring configured paths over `PATH`.
    pub fn locate(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Result<Self> {
        Ok(Self::new(
            get_tool_path("ffmpeg", ffmpeg)?,
            get_tool_path("ffprobe", ffprobe)?,
        ))
    }

    /// Kill the engine if a single invocation runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe
    }
}

impl MediaEngine for FfmpegEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        tracing::debug!("Probing {:?}", path);
        probe_with_ffprobe(&self.ffprobe, path, self.timeout)
    }

    fn transcode(&self, args: &[String]) -> Result<()> {
        tracing::debug!("Running {:?} {:?}", self.ffmpeg, args);

        let output = ToolCommand::new(self.ffmpeg.clone())
            .args(args.iter().cloned())
            .timeout(self.timeout)
            .execute_blocking()?;

        if !output.stderr.trim().is_empty() {
            tracing::trace!("ffmpeg stderr: {}", output.stderr.trim());
        }

        Ok(())
    }
}
