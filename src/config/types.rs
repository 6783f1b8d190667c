use clipforge_av::actions::DEFAULT_SLOW_FRAME_RATE;
use clipforge_av::{ActionOptions, MediaOperation};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Operations run by `clipforge run` when no job file is given.
    #[serde(default)]
    pub jobs: Vec<MediaOperation>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Kill a single ffmpeg/ffprobe run after this many seconds (default: no limit)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Output frame rate for silent-video speed changes
    #[serde(default = "default_slow_frame_rate")]
    pub slow_frame_rate: u32,

    /// Replace existing output files
    #[serde(default)]
    pub overwrite: bool,
}

fn default_slow_frame_rate() -> u32 {
    DEFAULT_SLOW_FRAME_RATE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            slow_frame_rate: default_slow_frame_rate(),
            overwrite: false,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn action_options(&self) -> ActionOptions {
        ActionOptions::default()
            .overwrite(self.overwrite)
            .slow_frame_rate(self.slow_frame_rate)
    }
}

/// A standalone list of jobs, as read by `clipforge run <file>`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JobFile {
    #[serde(default)]
    pub jobs: Vec<MediaOperation>,
}
