//! Error types for clipforge-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or running a media operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A time-bounded operation was given an empty or inverted range.
    #[error("invalid range {start}..{end}: {reason}")]
    InvalidRange {
        start: String,
        end: String,
        reason: String,
    },

    /// An input list that must be non-empty was empty.
    #[error("{operation}: input list is empty")]
    EmptyInput { operation: String },

    /// Audio extraction was requested from a video without an audio track.
    #[error("no audio track in {}", path.display())]
    NoAudioTrack { path: PathBuf },

    /// A speed factor falls outside the range allowed for the input.
    #[error("speed factor {factor} out of range {range} for {context}")]
    FactorOutOfRange {
        factor: f64,
        range: String,
        context: String,
    },

    /// The external engine ran but reported failure.
    #[error("engine failure: {tool}: {message}")]
    Engine { tool: String, message: String },

    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Failed to parse tool output.
    #[error("failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// The specified file was not found.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Workspace error.
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl Error {
    /// Create an engine failure error.
    pub fn engine(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a parse error.
    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an invalid range error.
    pub fn invalid_range(
        start: impl ToString,
        end: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an empty input error.
    pub fn empty_input(operation: impl Into<String>) -> Self {
        Self::EmptyInput {
            operation: operation.into(),
        }
    }

    /// Whether the caller should abort on this error.
    ///
    /// `NoAudioTrack` is a diagnostic: the operation wrote nothing and the
    /// process may carry on.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::NoAudioTrack { .. })
    }
}
