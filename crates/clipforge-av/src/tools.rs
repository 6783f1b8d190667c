//! External tool detection and management.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tools every operation depends on.
pub const REQUIRED_TOOLS: [&str; 2] = ["ffmpeg", "ffprobe"];

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// ffmpeg and ffprobe take a single-dash `-version`.
///
/// # Example
///
/// ```no_run
/// use clipforge_av::check_tool;
///
/// let info = check_tool("ffmpeg");
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_with_arg(name, "-version")
}

/// Check if a tool is available using a custom version argument.
pub fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    let mut info = run_version(name, Path::new(name), version_arg);
    if info.available {
        info.path = which::which(name).ok();
    }
    info
}

/// Check a tool at an explicit executable path.
pub fn check_tool_at(name: &str, path: &Path) -> ToolInfo {
    let mut info = run_version(name, path, "-version");
    if info.available {
        info.path = Some(path.to_path_buf());
    }
    info
}

fn run_version(name: &str, program: &Path, version_arg: &str) -> ToolInfo {
    match Command::new(program).arg(version_arg).output() {
        Ok(output) if output.status.success() => ToolInfo {
            name: name.to_string(),
            available: true,
            version: String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string()),
            path: None,
        },
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Check ffmpeg and ffprobe on `PATH`.
pub fn check_tools() -> Vec<ToolInfo> {
    check_configured_tools(None, None)
}

/// Check ffmpeg and ffprobe the way an engine would resolve them.
///
/// A configured path that exists is checked directly; otherwise the tool is
/// looked up on `PATH`, matching [`get_tool_path`].
pub fn check_configured_tools(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Vec<ToolInfo> {
    REQUIRED_TOOLS
        .iter()
        .zip([ffmpeg, ffprobe])
        .map(|(name, configured)| match configured {
            Some(path) if path.exists() => check_tool_at(name, path),
            Some(path) => {
                tracing::warn!(
                    "Configured {} path {:?} does not exist, checking PATH",
                    name,
                    path
                );
                check_tool(name)
            }
            None => check_tool(name),
        })
        .collect()
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            "Configured {} path {:?} does not exist, falling back to PATH",
            name,
            path
        );
    }

    require_tool(name)
}
