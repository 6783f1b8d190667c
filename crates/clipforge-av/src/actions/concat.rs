//! Container-aware concatenation.

use super::{prepare_output, require_inputs, run_engine, ActionOptions};
use crate::ffmpeg::{concat_list_entry, FfmpegArgs};
use crate::{Error, MediaEngine, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Play each input in list order as one output.
///
/// Uses the ffmpeg concat demuxer. Inputs are assumed to share a container
/// and stream layout; mismatches surface as an engine failure.
pub fn concatenate(
    engine: &dyn MediaEngine,
    inputs: &[PathBuf],
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    if inputs.is_empty() {
        return Err(Error::empty_input("Concatenate"));
    }
    require_inputs(inputs.iter().map(PathBuf::as_path))?;

    tracing::info!("Concatenating {} files into {:?}", inputs.len(), output);

    let workspace = prepare_output(output, options)?;

    // The demuxer resolves relative entries against the list file, which
    // lives in the workspace, so every entry is made absolute.
    let list_path = workspace.temp_file("concat.txt");
    {
        let mut list = std::io::BufWriter::new(std::fs::File::create(&list_path)?);
        for input in inputs {
            let absolute = std::fs::canonicalize(input)?;
            list.write_all(concat_list_entry(&absolute).as_bytes())?;
        }
        list.flush()?;
    }

    let args = FfmpegArgs::new()
        .opt("-f", "concat")
        .opt("-safe", "0")
        .input(&list_path)
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}
