//! Media operation data model.
//!
//! A [`MediaOperation`] is built from caller arguments (or deserialized from a
//! job file), validated once, executed once by the
//! [`Dispatcher`](crate::Dispatcher), and discarded.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default factor for speed-up entry points when none is given.
pub const DEFAULT_SPEED_UP: f64 = 2.0;

/// Default factor for slow-down entry points when none is given.
pub const DEFAULT_SLOW_DOWN: f64 = 0.5;

/// Highest audio speed-up factor known to produce usable output.
pub const AUDIO_SPEED_UP_TESTED_MAX: f64 = 8.0;

/// One named media operation with its operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaOperation {
    /// Keep `[start, end)` seconds of a video, audio included.
    Cut {
        input: PathBuf,
        start: f64,
        end: f64,
        output: PathBuf,
    },
    /// Play each input in list order (container-aware).
    Concatenate { inputs: Vec<PathBuf>, output: PathBuf },
    /// Replace the video's audio track with `audio`.
    AddAudio {
        audio: PathBuf,
        video: PathBuf,
        output: PathBuf,
    },
    /// Write the video's audio track to `output`.
    ExtractAudio { video: PathBuf, output: PathBuf },
    /// Copy the video with its audio removed.
    ExtractSilentVideo { video: PathBuf, output: PathBuf },
    /// Frame-level slice of an audio file between two `m:ss` marks.
    AudioSlice {
        input: PathBuf,
        start: String,
        end: String,
        output: PathBuf,
    },
    /// Raw byte concatenation of audio files.
    AudioConcatenate { inputs: Vec<PathBuf>, output: PathBuf },
    /// Speed up or slow down a video.
    ChangeSpeed {
        input: PathBuf,
        factor: f64,
        direction: SpeedDirection,
        /// Whether the input has audio; probed when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        has_audio: Option<bool>,
        output: PathBuf,
    },
    /// Change the tempo of an audio-only file.
    AudioSpeed {
        input: PathBuf,
        factor: f64,
        direction: SpeedDirection,
        output: PathBuf,
    },
}

impl MediaOperation {
    /// Human-readable operation name.
    pub fn name(&self) -> &'static str {
        match self {
            MediaOperation::Cut { .. } => "Cut",
            MediaOperation::Concatenate { .. } => "Concatenate",
            MediaOperation::AddAudio { .. } => "Add Audio",
            MediaOperation::ExtractAudio { .. } => "Extract Audio",
            MediaOperation::ExtractSilentVideo { .. } => "Extract Silent Video",
            MediaOperation::AudioSlice { .. } => "Audio Slice",
            MediaOperation::AudioConcatenate { .. } => "Audio Concatenate",
            MediaOperation::ChangeSpeed {
                direction: SpeedDirection::SpeedUp,
                ..
            } => "Video Speed-Up",
            MediaOperation::ChangeSpeed {
                direction: SpeedDirection::SlowDown,
                ..
            } => "Video Slow-Down",
            MediaOperation::AudioSpeed {
                direction: SpeedDirection::SpeedUp,
                ..
            } => "Audio Speed-Up",
            MediaOperation::AudioSpeed {
                direction: SpeedDirection::SlowDown,
                ..
            } => "Audio Slow-Down",
        }
    }

    /// Input files read by the operation.
    pub fn inputs(&self) -> Vec<&Path> {
        match self {
            MediaOperation::Cut { input, .. }
            | MediaOperation::AudioSlice { input, .. }
            | MediaOperation::ChangeSpeed { input, .. }
            | MediaOperation::AudioSpeed { input, .. } => vec![input.as_path()],
            MediaOperation::Concatenate { inputs, .. }
            | MediaOperation::AudioConcatenate { inputs, .. } => {
                inputs.iter().map(PathBuf::as_path).collect()
            }
            MediaOperation::AddAudio { audio, video, .. } => vec![audio.as_path(), video.as_path()],
            MediaOperation::ExtractAudio { video, .. }
            | MediaOperation::ExtractSilentVideo { video, .. } => vec![video.as_path()],
        }
    }

    /// File the operation produces.
    pub fn output(&self) -> &Path {
        match self {
            MediaOperation::Cut { output, .. }
            | MediaOperation::Concatenate { output, .. }
            | MediaOperation::AddAudio { output, .. }
            | MediaOperation::ExtractAudio { output, .. }
            | MediaOperation::ExtractSilentVideo { output, .. }
            | MediaOperation::AudioSlice { output, .. }
            | MediaOperation::AudioConcatenate { output, .. }
            | MediaOperation::ChangeSpeed { output, .. }
            | MediaOperation::AudioSpeed { output, .. } => output,
        }
    }

    /// Check the parameters that can be checked without touching any file.
    ///
    /// Checks that need the engine (source duration, audio presence when no
    /// hint is given) happen when the operation runs.
    pub fn validate(&self) -> Result<()> {
        match self {
            MediaOperation::Cut { start, end, .. } => TimeRange::new(*start, *end).map(|_| ()),
            MediaOperation::Concatenate { inputs, .. } if inputs.is_empty() => {
                Err(Error::empty_input(self.name()))
            }
            MediaOperation::AudioConcatenate { inputs, .. } if inputs.is_empty() => {
                Err(Error::empty_input(self.name()))
            }
            MediaOperation::AudioSlice { start, end, .. } => {
                ClockRange::parse(start, end).map(|_| ())
            }
            MediaOperation::ChangeSpeed {
                factor,
                direction,
                has_audio,
                ..
            } => {
                let factor = SpeedFactor::new(*factor)?;
                match has_audio {
                    Some(has_audio) => StreamLayout::for_video(*has_audio).check(factor, *direction),
                    None => direction.check(factor),
                }
            }
            MediaOperation::AudioSpeed {
                factor, direction, ..
            } => StreamLayout::AudioOnly.check(SpeedFactor::new(*factor)?, *direction),
            _ => Ok(()),
        }
    }
}

/// A `[start, end)` range in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Build a range, requiring `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::invalid_range(start, end, "bounds must be finite"));
        }
        if start < 0.0 {
            return Err(Error::invalid_range(start, end, "start must not be negative"));
        }
        if start >= end {
            return Err(Error::invalid_range(start, end, "start must be before end"));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Require the range to end within a source of the given duration.
    /// An unknown duration is accepted.
    pub fn check_within(&self, duration: Option<Duration>) -> Result<()> {
        match duration {
            Some(d) if self.end > d.as_secs_f64() => Err(Error::invalid_range(
                self.start,
                self.end,
                format!("end is past the source duration of {:.3}s", d.as_secs_f64()),
            )),
            _ => Ok(()),
        }
    }
}

/// An offset written as `minutes:seconds`, held in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    millis: u64,
}

impl ClockTime {
    pub fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Seconds with millisecond precision, as ffmpeg expects for `-ss`/`-to`.
    pub fn to_seconds_arg(&self) -> String {
        format!("{}.{:03}", self.millis / 1000, self.millis % 1000)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("expected minutes:seconds, got {s:?}"));

        let (minutes, seconds) = s.trim().split_once(':').ok_or_else(invalid)?;
        let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
        let seconds: u64 = seconds.parse().map_err(|_| invalid())?;

        minutes
            .checked_mul(60_000)
            .and_then(|m| seconds.checked_mul(1_000).and_then(|secs| m.checked_add(secs)))
            .map(Self::from_millis)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.millis / 1000;
        write!(f, "{}:{:02}", secs / 60, secs % 60)
    }
}

/// Start and end marks of an audio slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl ClockRange {
    /// Parse both marks and require `start < end`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start_time: ClockTime = start.parse()?;
        let end_time: ClockTime = end.parse()?;
        if start_time >= end_time {
            return Err(Error::invalid_range(start, end, "start must be before end"));
        }
        Ok(Self {
            start: start_time,
            end: end_time,
        })
    }
}

/// Which entry point a speed change came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedDirection {
    SpeedUp,
    SlowDown,
}

impl SpeedDirection {
    /// Range accepted by the entry point regardless of stream layout.
    /// Factor 1 belongs to both.
    fn range(self) -> FactorRange {
        match self {
            SpeedDirection::SpeedUp => FactorRange::at_least(1.0),
            SpeedDirection::SlowDown => FactorRange::up_to_one(0.0, false),
        }
    }

    pub(crate) fn check(self, factor: SpeedFactor) -> Result<()> {
        let label = match self {
            SpeedDirection::SpeedUp => "speed-up",
            SpeedDirection::SlowDown => "slow-down",
        };
        self.range().check(factor, label)
    }
}

/// Stream layout of a speed-change input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamLayout {
    SilentVideo,
    VideoWithAudio,
    AudioOnly,
}

impl StreamLayout {
    pub fn for_video(has_audio: bool) -> Self {
        if has_audio {
            StreamLayout::VideoWithAudio
        } else {
            StreamLayout::SilentVideo
        }
    }

    /// Whether an audio tempo filter is involved.
    pub fn has_audio(self) -> bool {
        !matches!(self, StreamLayout::SilentVideo)
    }

    /// Valid factors for this layout and direction.
    ///
    /// Audio tempo stretching below 0.5 degrades badly, so any layout with
    /// audio is limited to `[0.5, 1]` when slowing down.
    pub fn factor_range(self, direction: SpeedDirection) -> FactorRange {
        match (self, direction) {
            (_, SpeedDirection::SpeedUp) => FactorRange::at_least(1.0),
            (StreamLayout::SilentVideo, SpeedDirection::SlowDown) => {
                FactorRange::up_to_one(0.0, false)
            }
            (_, SpeedDirection::SlowDown) => FactorRange::up_to_one(0.5, true),
        }
    }

    /// Reject `factor` before any I/O if it is outside the valid range.
    pub fn check(self, factor: SpeedFactor, direction: SpeedDirection) -> Result<()> {
        let context = match (self, direction) {
            (StreamLayout::SilentVideo, SpeedDirection::SpeedUp) => "silent video speed-up",
            (StreamLayout::SilentVideo, SpeedDirection::SlowDown) => "silent video slow-down",
            (StreamLayout::VideoWithAudio, SpeedDirection::SpeedUp) => "video speed-up with audio",
            (StreamLayout::VideoWithAudio, SpeedDirection::SlowDown) => {
                "video slow-down with audio"
            }
            (StreamLayout::AudioOnly, SpeedDirection::SpeedUp) => "audio speed-up",
            (StreamLayout::AudioOnly, SpeedDirection::SlowDown) => "audio slow-down",
        };
        self.factor_range(direction).check(factor, context)
    }
}

/// Interval of permitted speed factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorRange {
    min: f64,
    min_inclusive: bool,
    max: f64,
}

impl FactorRange {
    fn at_least(min: f64) -> Self {
        Self {
            min,
            min_inclusive: true,
            max: f64::INFINITY,
        }
    }

    fn up_to_one(min: f64, min_inclusive: bool) -> Self {
        Self {
            min,
            min_inclusive,
            max: 1.0,
        }
    }

    pub fn contains(&self, factor: f64) -> bool {
        let above_min = if self.min_inclusive {
            factor >= self.min
        } else {
            factor > self.min
        };
        above_min && factor <= self.max
    }

    fn check(&self, factor: SpeedFactor, context: &str) -> Result<()> {
        if self.contains(factor.get()) {
            Ok(())
        } else {
            Err(Error::FactorOutOfRange {
                factor: factor.get(),
                range: self.to_string(),
                context: context.to_string(),
            })
        }
    }
}

impl fmt::Display for FactorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_inclusive { '[' } else { '(' };
        if self.max.is_infinite() {
            write!(f, "{open}{}, inf)", self.min)
        } else {
            write!(f, "{open}{}, {}]", self.min, self.max)
        }
    }
}

/// A positive, finite playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SpeedFactor(f64);

impl SpeedFactor {
    pub fn new(factor: f64) -> Result<Self> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(Error::FactorOutOfRange {
                factor,
                range: "(0, inf)".to_string(),
                context: "any speed change".to_string(),
            })
        }
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// Video presentation timestamps are scaled by the inverse factor.
    pub fn setpts_filter(&self) -> String {
        format!("setpts=(1/{})*PTS", self.0)
    }

    /// Audio tempo takes the factor directly.
    pub fn atempo_filter(&self) -> String {
        format!("atempo={}", self.0)
    }
}

impl fmt::Display for SpeedFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_rules() {
        assert!(TimeRange::new(4.0, 10.0).is_ok());
        assert!(TimeRange::new(0.0, 0.5).is_ok());
        assert!(matches!(TimeRange::new(10.0, 4.0), Err(Error::InvalidRange { .. })));
        assert!(matches!(TimeRange::new(5.0, 5.0), Err(Error::InvalidRange { .. })));
        assert!(matches!(TimeRange::new(-1.0, 5.0), Err(Error::InvalidRange { .. })));
        assert!(matches!(TimeRange::new(0.0, f64::NAN), Err(Error::InvalidRange { .. })));
        assert_eq!(TimeRange::new(0.5, 846.0).unwrap().duration(), 845.5);
    }

    #[test]
    fn time_range_within_duration() {
        let range = TimeRange::new(4.0, 10.0).unwrap();
        assert!(range.check_within(Some(Duration::from_secs(10))).is_ok());
        assert!(range.check_within(None).is_ok());
        let err = range.check_within(Some(Duration::from_secs(9))).unwrap_err();
        assert!(err.to_string().contains("past the source duration"), "{err}");
    }

    #[test]
    fn clock_time_parses_minutes_and_seconds() {
        assert_eq!("0:00".parse::<ClockTime>().unwrap().as_millis(), 0);
        assert_eq!("0:58".parse::<ClockTime>().unwrap().as_millis(), 58_000);
        assert_eq!("14:06".parse::<ClockTime>().unwrap().as_millis(), 846_000);
        // The seconds field is not capped at 59.
        assert_eq!("0:75".parse::<ClockTime>().unwrap().as_millis(), 75_000);
    }

    #[test]
    fn clock_time_rejects_malformed() {
        for bad in ["", "58", "a:10", "1:-5", "-1:05", "1:2:3", "1.5:00"] {
            assert!(
                matches!(bad.parse::<ClockTime>(), Err(Error::InvalidInput(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn clock_time_formatting() {
        let t = ClockTime::from_millis(58_000);
        assert_eq!(t.to_string(), "0:58");
        assert_eq!(t.to_seconds_arg(), "58.000");
        assert_eq!(ClockTime::from_millis(846_250).to_seconds_arg(), "846.250");
    }

    #[test]
    fn clock_range_requires_order() {
        let range = ClockRange::parse("0:00", "0:58").unwrap();
        assert_eq!(range.start.as_millis(), 0);
        assert_eq!(range.end.as_millis(), 58_000);
        assert!(matches!(
            ClockRange::parse("0:58", "0:58"),
            Err(Error::InvalidRange { .. })
        ));
        assert!(matches!(
            ClockRange::parse("1:00", "0:30"),
            Err(Error::InvalidRange { .. })
        ));
    }

    #[test]
    fn speed_factor_must_be_positive() {
        assert!(SpeedFactor::new(2.0).is_ok());
        assert!(SpeedFactor::new(0.0).is_err());
        assert!(SpeedFactor::new(-1.0).is_err());
        assert!(SpeedFactor::new(f64::INFINITY).is_err());
    }

    #[test]
    fn speed_filters_are_inverse() {
        let slow = SpeedFactor::new(0.5).unwrap();
        assert_eq!(slow.setpts_filter(), "setpts=(1/0.5)*PTS");
        assert_eq!(slow.atempo_filter(), "atempo=0.5");
        let fast = SpeedFactor::new(2.0).unwrap();
        assert_eq!(fast.setpts_filter(), "setpts=(1/2)*PTS");
        assert_eq!(fast.atempo_filter(), "atempo=2");
    }

    #[test]
    fn video_with_audio_ranges() {
        let layout = StreamLayout::VideoWithAudio;
        let f = |v| SpeedFactor::new(v).unwrap();
        assert!(layout.check(f(0.5), SpeedDirection::SlowDown).is_ok());
        assert!(layout.check(f(1.0), SpeedDirection::SlowDown).is_ok());
        assert!(matches!(
            layout.check(f(0.4), SpeedDirection::SlowDown),
            Err(Error::FactorOutOfRange { .. })
        ));
        assert!(layout.check(f(1.5), SpeedDirection::SpeedUp).is_ok());
        assert!(layout.check(f(1.0), SpeedDirection::SpeedUp).is_ok());
        // Asking the speed-up path for a slow-down is rejected, not rerouted.
        assert!(matches!(
            layout.check(f(0.9), SpeedDirection::SpeedUp),
            Err(Error::FactorOutOfRange { .. })
        ));
    }

    #[test]
    fn silent_video_ranges() {
        let layout = StreamLayout::SilentVideo;
        let f = |v| SpeedFactor::new(v).unwrap();
        for v in [0.1, 0.2, 0.4, 0.5, 1.0] {
            assert!(layout.check(f(v), SpeedDirection::SlowDown).is_ok(), "{v}");
        }
        assert!(layout.check(f(1.1), SpeedDirection::SlowDown).is_err());
        assert!(layout.check(f(8.0), SpeedDirection::SpeedUp).is_ok());
    }

    #[test]
    fn audio_only_ranges() {
        let layout = StreamLayout::AudioOnly;
        let f = |v| SpeedFactor::new(v).unwrap();
        assert!(layout.check(f(0.75), SpeedDirection::SlowDown).is_ok());
        assert!(layout.check(f(0.25), SpeedDirection::SlowDown).is_err());
        assert!(layout.check(f(1.2), SpeedDirection::SlowDown).is_err());
        assert!(layout.check(f(16.0), SpeedDirection::SpeedUp).is_ok());
        assert!(layout.check(f(0.9), SpeedDirection::SpeedUp).is_err());
    }

    #[test]
    fn factor_range_display() {
        assert_eq!(
            StreamLayout::SilentVideo
                .factor_range(SpeedDirection::SlowDown)
                .to_string(),
            "(0, 1]"
        );
        assert_eq!(
            StreamLayout::AudioOnly
                .factor_range(SpeedDirection::SlowDown)
                .to_string(),
            "[0.5, 1]"
        );
        assert_eq!(
            StreamLayout::AudioOnly
                .factor_range(SpeedDirection::SpeedUp)
                .to_string(),
            "[1, inf)"
        );
    }

    #[test]
    fn validate_without_io() {
        let op = MediaOperation::Concatenate {
            inputs: vec![],
            output: "out.mp4".into(),
        };
        assert!(matches!(op.validate(), Err(Error::EmptyInput { .. })));

        let op = MediaOperation::ChangeSpeed {
            input: "in.mp4".into(),
            factor: 0.4,
            direction: SpeedDirection::SlowDown,
            has_audio: None,
            output: "out.mp4".into(),
        };
        // Layout unknown: only the entry-point rule applies.
        assert!(op.validate().is_ok());

        let op = MediaOperation::ChangeSpeed {
            input: "in.mp4".into(),
            factor: 0.4,
            direction: SpeedDirection::SlowDown,
            has_audio: Some(true),
            output: "out.mp4".into(),
        };
        assert!(matches!(op.validate(), Err(Error::FactorOutOfRange { .. })));
    }

    #[test]
    fn operation_accessors() {
        let op = MediaOperation::AddAudio {
            audio: "ar_audio.mp3".into(),
            video: "out.mp4".into(),
            output: "out_with_audio.mp4".into(),
        };
        assert_eq!(op.name(), "Add Audio");
        assert_eq!(op.inputs(), vec![Path::new("ar_audio.mp3"), Path::new("out.mp4")]);
        assert_eq!(op.output(), Path::new("out_with_audio.mp4"));
    }

    #[test]
    fn deserialize_tagged_operation() {
        let json = r#"{"type": "change_speed", "input": "WeChat.mp4", "factor": 2.0,
                       "direction": "speed_up", "output": "v_acc.mp4"}"#;
        let op: MediaOperation = serde_json::from_str(json).unwrap();
        assert_eq!(
            op,
            MediaOperation::ChangeSpeed {
                input: "WeChat.mp4".into(),
                factor: 2.0,
                direction: SpeedDirection::SpeedUp,
                has_audio: None,
                output: "v_acc.mp4".into(),
            }
        );
    }
}
