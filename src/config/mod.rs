mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./clipforge.toml",
        "~/.config/clipforge/config.toml",
        "/etc/clipforge/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Load a job list from a TOML file of `[[jobs]]` tables
pub fn load_jobs(path: &Path) -> Result<JobFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {:?}", path))?;

    let jobs: JobFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse job file: {:?}", path))?;

    validate_jobs(&jobs.jobs)?;

    Ok(jobs)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.engine.slow_frame_rate == 0 {
        anyhow::bail!("engine.slow_frame_rate must be greater than 0");
    }

    if config.engine.timeout_secs == Some(0) {
        anyhow::bail!("engine.timeout_secs must be greater than 0");
    }

    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    validate_jobs(&config.jobs)
}

/// Check every job's parameters without touching any file
fn validate_jobs(jobs: &[clipforge_av::MediaOperation]) -> Result<()> {
    for (i, job) in jobs.iter().enumerate() {
        job.validate()
            .with_context(|| format!("Job {} ({}) is invalid", i + 1, job.name()))?;
    }
    Ok(())
}
