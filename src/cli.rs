use clap::{Parser, Subcommand};
use clipforge_av::{DEFAULT_SLOW_DOWN, DEFAULT_SPEED_UP};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipforge")]
#[command(author, version, about = "Validated ffmpeg media operations")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Replace output files that already exist
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// Validate and show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep a [start, end) range of a video, in seconds
    Cut {
        input: PathBuf,
        start: f64,
        end: f64,
        output: PathBuf,
    },

    /// Join videos end to end (container-aware)
    Concat {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Inputs, in playback order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Put an audio file on a video as its audio track
    AddAudio {
        audio: PathBuf,
        video: PathBuf,
        output: PathBuf,
    },

    /// Write a video's audio track to a file
    ExtractAudio { video: PathBuf, output: PathBuf },

    /// Copy a video without its audio
    StripAudio { video: PathBuf, output: PathBuf },

    /// Slice an audio file between two minutes:seconds marks
    AudioSlice {
        input: PathBuf,
        /// Start mark, e.g. 0:00
        start: String,
        /// End mark, e.g. 0:58
        end: String,
        output: PathBuf,
    },

    /// Append audio files byte for byte
    AudioConcat {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Inputs, in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Speed up a video
    SpeedUp {
        input: PathBuf,
        output: PathBuf,

        /// Speed factor, at least 1
        #[arg(short, long, default_value_t = DEFAULT_SPEED_UP)]
        factor: f64,

        #[command(flatten)]
        audio: AudioHint,
    },

    /// Slow down a video
    SlowDown {
        input: PathBuf,
        output: PathBuf,

        /// Speed factor, at most 1
        #[arg(short, long, default_value_t = DEFAULT_SLOW_DOWN)]
        factor: f64,

        #[command(flatten)]
        audio: AudioHint,
    },

    /// Speed up an audio file without changing pitch
    AudioSpeedUp {
        input: PathBuf,
        output: PathBuf,

        /// Tempo factor, at least 1
        #[arg(short, long, default_value_t = DEFAULT_SPEED_UP)]
        factor: f64,
    },

    /// Slow down an audio file without changing pitch
    AudioSlowDown {
        input: PathBuf,
        output: PathBuf,

        /// Tempo factor, between 0.5 and 1
        #[arg(short, long, default_value_t = DEFAULT_SLOW_DOWN)]
        factor: f64,
    },

    /// Run a list of jobs from a TOML file, or the jobs in the config
    Run {
        /// Job file with [[jobs]] tables
        jobs: Option<PathBuf>,
    },

    /// Probe a media file and display information
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

/// Whether the input video has audio; probed when neither flag is given.
#[derive(clap::Args)]
pub struct AudioHint {
    /// The input has an audio track
    #[arg(long, conflicts_with = "no_audio")]
    pub with_audio: bool,

    /// The input has no audio track
    #[arg(long)]
    pub no_audio: bool,
}

impl AudioHint {
    pub fn has_audio(&self) -> Option<bool> {
        match (self.with_audio, self.no_audio) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
