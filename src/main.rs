mod cli;

use clipforge::{config, pipeline};
use clipforge_av::{Dispatcher, FfmpegEngine, MediaEngine, MediaOperation, SpeedDirection};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipforge=trace,clipforge_av=trace".to_string()
        } else {
            "clipforge=info,clipforge_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let flags = RunFlags {
        config: cli.config,
        overwrite: cli.overwrite,
        dry_run: cli.dry_run,
    };

    let op = match cli.command {
        Commands::Cut {
            input,
            start,
            end,
            output,
        } => MediaOperation::Cut {
            input,
            start,
            end,
            output,
        },
        Commands::Concat { output, inputs } => MediaOperation::Concatenate { inputs, output },
        Commands::AddAudio {
            audio,
            video,
            output,
        } => MediaOperation::AddAudio {
            audio,
            video,
            output,
        },
        Commands::ExtractAudio { video, output } => MediaOperation::ExtractAudio { video, output },
        Commands::StripAudio { video, output } => {
            MediaOperation::ExtractSilentVideo { video, output }
        }
        Commands::AudioSlice {
            input,
            start,
            end,
            output,
        } => MediaOperation::AudioSlice {
            input,
            start,
            end,
            output,
        },
        Commands::AudioConcat { output, inputs } => {
            MediaOperation::AudioConcatenate { inputs, output }
        }
        Commands::SpeedUp {
            input,
            output,
            factor,
            audio,
        } => MediaOperation::ChangeSpeed {
            input,
            factor,
            direction: SpeedDirection::SpeedUp,
            has_audio: audio.has_audio(),
            output,
        },
        Commands::SlowDown {
            input,
            output,
            factor,
            audio,
        } => MediaOperation::ChangeSpeed {
            input,
            factor,
            direction: SpeedDirection::SlowDown,
            has_audio: audio.has_audio(),
            output,
        },
        Commands::AudioSpeedUp {
            input,
            output,
            factor,
        } => MediaOperation::AudioSpeed {
            input,
            factor,
            direction: SpeedDirection::SpeedUp,
            output,
        },
        Commands::AudioSlowDown {
            input,
            output,
            factor,
        } => MediaOperation::AudioSpeed {
            input,
            factor,
            direction: SpeedDirection::SlowDown,
            output,
        },
        Commands::Run { jobs } => return run_jobs(jobs.as_deref(), &flags),
        Commands::Probe { file, json } => return probe_file(&file, flags.config.as_deref(), json),
        Commands::CheckTools => return check_tools(flags.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(flags.config);
            return validate_config(path.as_deref());
        }
        Commands::Version => {
            println!("clipforge {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };

    run_operation(&op, &flags)
}

/// Global flags shared by every operation subcommand.
struct RunFlags {
    config: Option<PathBuf>,
    overwrite: bool,
    dry_run: bool,
}

/// Build the engine from config, deferring a missing tool to first use.
fn build_engine(config: &config::Config) -> FfmpegEngine {
    let engine = FfmpegEngine::locate(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
    .unwrap_or_else(|e| {
        tracing::debug!("{}; using bare tool names", e);
        FfmpegEngine::new("ffmpeg", "ffprobe")
    });
    engine.with_timeout(config.engine.timeout())
}

fn build_dispatcher(config: &config::Config, flags: &RunFlags) -> Dispatcher<FfmpegEngine> {
    let mut options = config.engine.action_options();
    if flags.overwrite {
        options = options.overwrite(true);
    }
    Dispatcher::with_options(build_engine(config), options)
}

fn run_operation(op: &MediaOperation, flags: &RunFlags) -> Result<()> {
    op.validate()
        .with_context(|| format!("Invalid {} parameters", op.name()))?;

    if flags.dry_run {
        println!("[DRY RUN] Would execute: {}", op.name());
        for input in op.inputs() {
            println!("  input:  {}", input.display());
        }
        println!("  output: {}", op.output().display());
        return Ok(());
    }

    let config = config::load_config_or_default(flags.config.as_deref())?;
    let dispatcher = build_dispatcher(&config, flags);

    match dispatcher.execute(op) {
        Ok(outcome) => {
            println!("{}: wrote {}", outcome.operation, outcome.output.display());
            Ok(())
        }
        Err(e) if !e.is_fatal() => {
            tracing::warn!("{}: {}", op.name(), e);
            println!("Warning: {}: {}", op.name(), e);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("{} failed", op.name())),
    }
}

fn run_jobs(jobs_path: Option<&Path>, flags: &RunFlags) -> Result<()> {
    let config = config::load_config_or_default(flags.config.as_deref())?;

    let jobs = match jobs_path {
        Some(path) => {
            tracing::info!("Loading jobs from {:?}", path);
            config::load_jobs(path)?.jobs
        }
        None => config.jobs.clone(),
    };

    println!("Jobs to execute: {}", jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        println!("  {}. {} -> {}", i + 1, job.name(), job.output().display());
    }

    let runner = pipeline::JobRunner::new(build_dispatcher(&config, flags), flags.dry_run);
    let report = runner.execute(&jobs)?;

    if flags.dry_run {
        println!("\n[DRY RUN] All {} jobs are valid", jobs.len());
        return Ok(());
    }

    println!("\nProcessing complete!");
    for output in &report.outputs {
        println!("Output: {}", output.display());
    }
    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }

    Ok(())
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let engine = build_engine(&config);
    let media_info = engine.probe(file)?;

    if json {
        let json_str = serde_json::to_string_pretty(&media_info)?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("File: {}", media_info.file_path.display());
    println!("Container: {}", media_info.container);
    println!("Size: {} bytes", media_info.file_size);
    if let Some(ref duration) = media_info.duration {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let hours = mins / 60;
        println!(
            "Duration: {:02}:{:02}:{:02}.{:03}",
            hours,
            mins % 60,
            secs % 60,
            duration.subsec_millis()
        );
    }

    println!("\nVideo Tracks: {}", media_info.video_tracks.len());
    for (i, track) in media_info.video_tracks.iter().enumerate() {
        print!("  [{}] {} {}x{}", i, track.codec, track.width, track.height);
        if let Some(fps) = track.frame_rate {
            print!(", {:.3} fps", fps);
        }
        println!();
    }

    println!("\nAudio Tracks: {}", media_info.audio_tracks.len());
    for (i, track) in media_info.audio_tracks.iter().enumerate() {
        print!("  [{}] {} {}ch", i, track.codec, track.channels);
        if let Some(rate) = track.sample_rate {
            print!(" {} Hz", rate);
        }
        if let Some(ref lang) = track.language {
            print!(" ({})", lang);
        }
        println!();
    }

    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tools = clipforge_av::check_configured_tools(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    );
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to run media operations.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    let show = |p: &Option<std::path::PathBuf>| {
        p.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(PATH)".to_string())
    };
    println!("  ffmpeg: {}", show(&config.tools.ffmpeg_path));
    println!("  ffprobe: {}", show(&config.tools.ffprobe_path));
    match config.engine.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    println!("  Slow frame rate: {} fps", config.engine.slow_frame_rate);
    println!("  Overwrite: {}", config.engine.overwrite);
    println!("  Jobs: {}", config.jobs.len());

    Ok(())
}
