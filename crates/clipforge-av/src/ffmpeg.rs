//! ffmpeg argument construction.

use std::path::Path;

/// Token-by-token ffmpeg argument list.
///
/// Every path and filter expression is its own token; nothing is joined into
/// a shell string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfmpegArgs {
    args: Vec<String>,
}

impl FfmpegArgs {
    /// Start an argument list with the flags every invocation uses.
    pub fn new() -> Self {
        Self {
            args: vec!["-hide_banner".to_string(), "-nostdin".to_string()],
        }
    }

    /// Add `-i <path>`.
    pub fn input(mut self, path: &Path) -> Self {
        self.args.push("-i".to_string());
        self.args.push(path_arg(path));
        self
    }

    /// Add one flag or value.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add a flag followed by its value.
    pub fn opt(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    /// Add `-map <spec>`.
    pub fn map(self, spec: &str) -> Self {
        self.opt("-map", spec)
    }

    /// Finish with the output path.
    pub fn output(mut self, path: &Path) -> Vec<String> {
        self.args.push(path_arg(path));
        self.args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Format seconds for `-ss`/`-to`.
pub fn seconds_arg(secs: f64) -> String {
    format!("{secs}")
}

/// One `file` line of an ffmpeg concat-demuxer list.
///
/// Single quotes are closed, escaped, and reopened (`'\''`).
pub fn concat_list_entry(path: &Path) -> String {
    format!("file '{}'\n", path_arg(path).replace('\'', r"'\''"))
}

/// `tpad` filter that holds the last frame for `secs` seconds.
pub fn clone_last_frame_filter(secs: f64) -> String {
    format!("tpad=stop_mode=clone:stop_duration={secs:.3}")
}
