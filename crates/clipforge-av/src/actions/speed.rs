//! Playback speed changes.
//!
//! Video frames are re-timed with `setpts=(1/factor)*PTS`, while audio goes
//! through `atempo=factor`. The two filters take the factor in inverse
//! senses: slowing down by 0.5 doubles every video timestamp and sets the
//! audio tempo to half.

use super::{prepare_output, require_inputs, run_engine, ActionOptions};
use crate::ffmpeg::FfmpegArgs;
use crate::operation::AUDIO_SPEED_UP_TESTED_MAX;
use crate::{MediaEngine, Result, SpeedDirection, SpeedFactor, StreamLayout};
use std::path::{Path, PathBuf};

/// Speed up or slow down a video.
///
/// `has_audio` skips probing when the caller already knows the layout. The
/// factor is checked against the range for the layout and direction before
/// the engine transcodes anything.
///
/// The tighter `[0.5, 1]` slow-down range of a video with audio is only
/// enforced before any file is read when `has_audio` is `Some(_)`; with
/// `None` it is enforced after the input has been inspected.
pub fn change_speed(
    engine: &dyn MediaEngine,
    input: &Path,
    factor: f64,
    direction: SpeedDirection,
    has_audio: Option<bool>,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    let factor = SpeedFactor::new(factor)?;
    direction.check(factor)?;

    let known = has_audio.map(StreamLayout::for_video);
    if let Some(layout) = known {
        layout.check(factor, direction)?;
    }
    require_inputs([input])?;

    let layout = match known {
        Some(layout) => layout,
        None => {
            let layout = StreamLayout::for_video(engine.probe(input)?.has_audio());
            layout.check(factor, direction)?;
            layout
        }
    };

    tracing::info!(
        "Changing speed of {:?} by {} ({:?}, {:?})",
        input,
        factor,
        direction,
        layout
    );

    let workspace = prepare_output(output, options)?;
    let args = speed_args(input, factor, layout, options.slow_frame_rate)
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}

/// Change the tempo of an audio-only file without altering pitch.
pub fn audio_speed(
    engine: &dyn MediaEngine,
    input: &Path,
    factor: f64,
    direction: SpeedDirection,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    let factor = SpeedFactor::new(factor)?;
    StreamLayout::AudioOnly.check(factor, direction)?;
    require_inputs([input])?;

    if factor.get() > AUDIO_SPEED_UP_TESTED_MAX {
        tracing::warn!(
            "Audio speed-up above {}x is untested, got {}",
            AUDIO_SPEED_UP_TESTED_MAX,
            factor
        );
    }

    tracing::info!("Changing tempo of {:?} by {}", input, factor);

    let workspace = prepare_output(output, options)?;
    let args = speed_args(input, factor, StreamLayout::AudioOnly, options.slow_frame_rate)
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}

fn speed_args(input: &Path, factor: SpeedFactor, layout: StreamLayout, fps: u32) -> FfmpegArgs {
    let args = FfmpegArgs::new().input(input);
    match layout {
        // Without a fixed output rate, large slow-downs leave the muxer with
        // degenerate timestamp spacing.
        StreamLayout::SilentVideo => args
            .opt("-r", fps.to_string())
            .opt("-filter:v", factor.setpts_filter()),
        StreamLayout::VideoWithAudio => args
            .opt(
                "-filter_complex",
                format!(
                    "[0:v]{}[v];[0:a]{}[a]",
                    factor.setpts_filter(),
                    factor.atempo_filter()
                ),
            )
            .map("[v]")
            .map("[a]"),
        StreamLayout::AudioOnly => args
            .opt("-filter:a", factor.atempo_filter())
            .arg("-vn"),
    }
}
