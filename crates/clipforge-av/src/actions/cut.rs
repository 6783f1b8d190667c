//! Time-range cutting.

use super::{prepare_output, require_inputs, run_engine, ActionOptions};
use crate::ffmpeg::{seconds_arg, FfmpegArgs};
use crate::{MediaEngine, Result, TimeRange};
use std::path::{Path, PathBuf};

/// Keep `[start, end)` seconds of `input`, with its audio track if it has one.
///
/// Fails with `InvalidRange` before any I/O if `start >= end`, and after
/// probing if `end` is past the source duration.
pub fn cut(
    engine: &dyn MediaEngine,
    input: &Path,
    start: f64,
    end: f64,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    let range = TimeRange::new(start, end)?;
    require_inputs([input])?;

    let info = engine.probe(input)?;
    range.check_within(info.duration)?;

    tracing::info!(
        "Cutting {:?} [{}s, {}s) into {:?}",
        input,
        range.start(),
        range.end(),
        output
    );

    let workspace = prepare_output(output, options)?;

    // Output-side seeking decodes from the start, so the cut lands on the
    // requested frame rather than the nearest keyframe.
    let args = FfmpegArgs::new()
        .input(input)
        .opt("-ss", seconds_arg(range.start()))
        .opt("-to", seconds_arg(range.end()))
        .map("0:v:0")
        .map("0:a:0?")
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}
