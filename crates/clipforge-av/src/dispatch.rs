//! Operation dispatch.

use crate::actions::{self, ActionOptions};
use crate::{MediaEngine, MediaOperation, Result};
use std::path::PathBuf;

/// Result of one successfully executed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Human-readable operation name.
    pub operation: &'static str,
    /// File that was written.
    pub output: PathBuf,
}

/// Validates [`MediaOperation`]s and routes them to their actions.
///
/// The dispatcher holds no state between calls; each `execute` is
/// independent and either produces its output or leaves none behind.
pub struct Dispatcher<E: MediaEngine> {
    engine: E,
    options: ActionOptions,
}

impl<E: MediaEngine> Dispatcher<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, ActionOptions::default())
    }

    pub fn with_options(engine: E, options: ActionOptions) -> Self {
        Self { engine, options }
    }

    /// Validate `op` and run it.
    pub fn execute(&self, op: &MediaOperation) -> Result<Outcome> {
        op.validate()?;

        tracing::debug!("Dispatching {} via {}", op.name(), self.engine.name());

        let engine: &dyn MediaEngine = &self.engine;
        let options = &self.options;

        let output = match op {
            MediaOperation::Cut {
                input,
                start,
                end,
                output,
            } => actions::cut(engine, input, *start, *end, output, options)?,
            MediaOperation::Concatenate { inputs, output } => {
                actions::concatenate(engine, inputs, output, options)?
            }
            MediaOperation::AddAudio {
                audio,
                video,
                output,
            } => actions::add_audio(engine, audio, video, output, options)?,
            MediaOperation::ExtractAudio { video, output } => {
                actions::extract_audio(engine, video, output, options)?
            }
            MediaOperation::ExtractSilentVideo { video, output } => {
                actions::extract_silent_video(engine, video, output, options)?
            }
            MediaOperation::AudioSlice {
                input,
                start,
                end,
                output,
            } => actions::audio_slice(engine, input, start, end, output, options)?,
            MediaOperation::AudioConcatenate { inputs, output } => {
                actions::audio_concatenate(inputs, output, options)?
            }
            MediaOperation::ChangeSpeed {
                input,
                factor,
                direction,
                has_audio,
                output,
            } => actions::change_speed(
                engine, input, *factor, *direction, *has_audio, output, options,
            )?,
            MediaOperation::AudioSpeed {
                input,
                factor,
                direction,
                output,
            } => actions::audio_speed(engine, input, *factor, *direction, output, options)?,
        };

        Ok(Outcome {
            operation: op.name(),
            output,
        })
    }
}
