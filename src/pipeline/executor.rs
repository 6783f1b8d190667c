use anyhow::{Context, Result};
use clipforge_av::{Dispatcher, MediaEngine, MediaOperation};
use std::path::PathBuf;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync>;

/// Summary of a finished job run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Outputs written, in job order.
    pub outputs: Vec<PathBuf>,
    /// Non-fatal diagnostics, one per job that was skipped.
    pub warnings: Vec<String>,
}

/// Execute a list of media operations in order
pub struct JobRunner<E: MediaEngine> {
    dispatcher: Dispatcher<E>,
    dry_run: bool,
    progress_callback: Option<ProgressCallback>,
}

impl<E: MediaEngine> JobRunner<E> {
    pub fn new(dispatcher: Dispatcher<E>, dry_run: bool) -> Self {
        Self {
            dispatcher,
            dry_run,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report_progress(&self, progress: f32, step: &str) {
        if let Some(ref cb) = self.progress_callback {
            cb(progress, step);
        }
        tracing::info!("[{:.0}%] {}", progress, step);
    }

    /// Run every job, stopping at the first fatal error
    pub fn execute(&self, jobs: &[MediaOperation]) -> Result<RunReport> {
        if jobs.is_empty() {
            anyhow::bail!("No jobs to execute");
        }

        let total_jobs = jobs.len();
        let mut report = RunReport::default();

        for (i, job) in jobs.iter().enumerate() {
            let progress = (i as f32 / total_jobs as f32) * 100.0;
            self.report_progress(progress, &format!("Starting: {}", job.name()));

            if self.dry_run {
                job.validate()
                    .with_context(|| format!("Job {} ({}) is invalid", i + 1, job.name()))?;
                tracing::info!("[DRY RUN] Would execute: {:?}", job);
                continue;
            }

            match self.dispatcher.execute(job) {
                Ok(outcome) => report.outputs.push(outcome.output),
                Err(e) if !e.is_fatal() => {
                    tracing::warn!("{}: {}", job.name(), e);
                    report.warnings.push(format!("{}: {}", job.name(), e));
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to execute job {}: {}", i + 1, job.name()))
                }
            }
        }

        self.report_progress(100.0, "Done");
        Ok(report)
    }
}
