//! Audio track muxing, extraction, and removal.

use super::{prepare_output, require_inputs, run_engine, ActionOptions};
use crate::ffmpeg::{clone_last_frame_filter, FfmpegArgs};
use crate::{Error, MediaEngine, Result};
use std::path::{Path, PathBuf};

/// Put `audio` on `video` as its only audio track.
///
/// Output length is the longer of the two:
/// - video longer than audio: the tail of the video plays silent.
/// - audio longer than video: the last video frame is held until the audio
///   ends.
pub fn add_audio(
    engine: &dyn MediaEngine,
    audio: &Path,
    video: &Path,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    require_inputs([audio, video])?;

    let video_info = engine.probe(video)?;
    let audio_info = engine.probe(audio)?;

    // Unlike extraction, a muxing source without audio is a hard failure.
    if !audio_info.has_audio() {
        return Err(Error::InvalidInput(format!(
            "audio source {:?} has no audio track",
            audio
        )));
    }

    tracing::info!("Adding audio {:?} to {:?}", audio, video);

    let workspace = prepare_output(output, options)?;

    let mut args = FfmpegArgs::new()
        .input(video)
        .input(audio)
        .map("0:v:0")
        .map("1:a:0");

    if let (Some(v), Some(a)) = (video_info.duration_secs(), audio_info.duration_secs()) {
        if a > v {
            tracing::debug!("Holding last frame for {:.3}s", a - v);
            args = args.opt("-filter:v", clone_last_frame_filter(a - v));
        }
    }

    let args = args.output(workspace.output());
    run_engine(engine, workspace, args, options)
}

/// Write the audio track of `video` to `output`.
///
/// A video without audio yields [`Error::NoAudioTrack`] and nothing is
/// written; callers treat it as a diagnostic, not a failure.
pub fn extract_audio(
    engine: &dyn MediaEngine,
    video: &Path,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    require_inputs([video])?;

    let info = engine.probe(video)?;
    if !info.has_audio() {
        tracing::warn!("{:?} has no audio track, nothing extracted", video);
        return Err(Error::NoAudioTrack {
            path: video.to_path_buf(),
        });
    }

    tracing::info!("Extracting audio from {:?}", video);

    let workspace = prepare_output(output, options)?;
    let args = FfmpegArgs::new()
        .input(video)
        .map("0:a:0")
        .arg("-vn")
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}

/// Copy `video` to `output` without its audio tracks.
///
/// All other streams are stream-copied untouched.
pub fn extract_silent_video(
    engine: &dyn MediaEngine,
    video: &Path,
    output: &Path,
    options: &ActionOptions,
) -> Result<PathBuf> {
    require_inputs([video])?;

    tracing::info!("Removing audio from {:?}", video);

    let workspace = prepare_output(output, options)?;
    let args = FfmpegArgs::new()
        .input(video)
        .map("0")
        .map("-0:a")
        .opt("-c", "copy")
        .output(workspace.output());

    run_engine(engine, workspace, args, options)
}
