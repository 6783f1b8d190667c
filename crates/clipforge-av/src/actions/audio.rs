//! Audio slicing and raw concatenation.

use super::{prepare_output, require_inputs, run_engine, ActionOptions};
use crate::ffmpeg::FfmpegArgs;
use crate::{ClockRange, Error, MediaEngine, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Keep the part of `input` between two `minutes:seconds` marks.
///
/// The slice is a stream copy: frames are cut, not re-encoded, so precision
/// at boundaries that fall inside a frame depends on the format.
pub fn audio_slice(
    engine: &dyn MediaEngine,
    input: &Path,
    start: &str,
    end: &str,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    let range = ClockRange::parse(start, end)?;
    require_inputs([input])?;

    tracing::info!(
        "Slicing {:?} from {} ms to {} ms",
        input,
        range.start.as_millis(),
        range.end.as_millis()
    );

    let workspace = prepare_output(output, options)?;
    let args = FfmpegArgs::new()
        .input(input)
        .opt("-ss", range.start.to_seconds_arg())
        .opt("-to", range.end.to_seconds_arg())
        .opt("-c", "copy")
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}

/// Append the raw bytes of each input, in order, into `output`.
///
/// There is no container handling and no check that the inputs share a
/// codec profile. This only yields a playable file for self-synchronising
/// streams such as headerless MP3 with matching parameters; use
/// [`concatenate`](super::concatenate) for anything else.
pub fn audio_concatenate(
    inputs: &[PathBuf],
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    if inputs.is_empty() {
        return Err(Error::empty_input("Audio Concatenate"));
    }
    require_inputs(inputs.iter().map(PathBuf::as_path))?;

    let workspace = prepare_output(output, options)?;

    {
        let mut out = BufWriter::new(File::create(workspace.output())?);
        for (i, input) in inputs.iter().enumerate() {
            let mut reader = BufReader::new(File::open(input)?);
            let copied = std::io::copy(&mut reader, &mut out)?;
            tracing::info!(
                "[{}/{}] appended {} bytes from {:?}",
                i + 1,
                inputs.len(),
                copied,
                input
            );
        }
        out.flush()?;
    }

    let output = workspace.finalize(options.overwrite)?;
    tracing::info!("Wrote {:?}", output);
    Ok(output)
}
