//! Structured error handling for the narration pipeline
//!
//! Fatal conditions (synthesis failure, mapper contract breaches, invalid
//! requests) surface as `PipelineError`; everything recoverable (detector
//! fallback, backend substitution, cache misses, skipped post-processing)
//! is represented in result data instead and never reaches this type.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with PipelineError
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the narration pipeline
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// Request validation errors (empty input, oversized text)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// A synthesis backend failed during actual audio generation
    #[error("Synthesis error in backend '{engine_id}': {message}")]
    Synthesis {
        engine_id: String,
        message: String,
    },

    /// Cue-to-timeline mapping contract breach (e.g. anchor beyond text)
    #[error("Mapping error: {message}")]
    Mapping { message: String },

    /// Audio processing errors
    #[error("Audio processing error ({operation}): {message}")]
    Audio {
        message: String,
        operation: AudioOperation,
    },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Audio operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOperation {
    Decoding,
    Resampling,
    PostProcessing,
    Saving,
    Caching,
}

impl fmt::Display for AudioOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOperation::Decoding => write!(f, "decoding"),
            AudioOperation::Resampling => write!(f, "resampling"),
            AudioOperation::PostProcessing => write!(f, "post-processing"),
            AudioOperation::Saving => write!(f, "saving"),
            AudioOperation::Caching => write!(f, "caching"),
        }
    }
}

/// Extension trait for adding context to foreign errors
pub trait ResultExt<T> {
    /// Add a simple message context
    fn context(self, msg: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::Synthesis {
            engine_id: "espeak".to_string(),
            message: "process exited with status 1".to_string(),
        };
        assert!(err.to_string().contains("Synthesis error"));
        assert!(err.to_string().contains("espeak"));
    }

    #[test]
    fn test_audio_operation_display() {
        assert_eq!(AudioOperation::PostProcessing.to_string(), "post-processing");
        assert_eq!(AudioOperation::Caching.to_string(), "caching");
    }

    #[test]
    fn test_context_ext() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = io.context("loading cache entry").unwrap_err();
        assert!(err.to_string().contains("loading cache entry"));
    }
}
