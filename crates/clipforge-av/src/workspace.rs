//! Scoped output staging.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Staging area for one operation's output.
///
/// The engine writes into a temporary directory created next to the final
/// destination. Only [`Workspace::finalize`] moves the result into place, so
/// a failed operation never leaves a partial file at the destination. The
/// temporary directory is removed on drop, on every exit path.
///
/// # Example
///
/// ```no_run
/// use clipforge_av::Workspace;
///
/// let workspace = Workspace::new("/videos/out.mp4")?;
/// // Run the engine with workspace.output() as its output path.
/// workspace.finalize(false)?;
/// # Ok::<(), clipforge_av::Error>(())
/// ```
pub struct Workspace {
    temp_dir: TempDir,
    staged_path: PathBuf,
    destination: PathBuf,
}

impl Workspace {
    /// Create a workspace for an operation whose final output is `destination`.
    ///
    /// The staged file keeps the destination's file name so that the engine
    /// picks the same container from the extension.
    pub fn new<P: AsRef<Path>>(destination: P) -> Result<Self> {
        let destination = destination.as_ref();

        let file_name = destination
            .file_name()
            .ok_or_else(|| Error::InvalidInput("Invalid output file path".to_string()))?;

        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !parent.is_dir() {
            return Err(Error::Workspace(format!(
                "Output directory does not exist: {:?}",
                parent
            )));
        }

        // Same filesystem as the destination, so finalize is a plain rename.
        let temp_dir = tempfile::Builder::new()
            .prefix(".clipforge-")
            .tempdir_in(&parent)
            .map_err(|e| Error::Workspace(e.to_string()))?;

        let staged_path = temp_dir.path().join(file_name);

        Ok(Self {
            temp_dir,
            staged_path,
            destination: destination.to_path_buf(),
        })
    }

    /// Path the engine should write to.
    pub fn output(&self) -> &Path {
        &self.staged_path
    }

    /// Final destination of the output.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Get the temp directory path.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a temp file path with the given name.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Move the staged output to its destination.
    ///
    /// With `overwrite`, an existing destination is replaced by a single
    /// rename; the staging directory shares its filesystem, so no other file
    /// next to the destination is touched.
    pub fn finalize(self, overwrite: bool) -> Result<PathBuf> {
        let dest = &self.destination;

        if !self.staged_path.exists() {
            return Err(Error::Workspace(format!(
                "Output file does not exist: {:?}",
                self.staged_path
            )));
        }

        if dest.exists() && !overwrite {
            return Err(Error::InvalidInput(format!(
                "Output file already exists: {:?}",
                dest
            )));
        }

        std::fs::rename(&self.staged_path, dest).map_err(|e| {
            Error::Workspace(format!("Failed to move output to destination: {}", e))
        })?;

        Ok(dest.clone())
    }
}
