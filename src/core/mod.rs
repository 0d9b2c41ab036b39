//! Core infrastructure: errors and configuration

pub mod config;
pub mod error;

pub use config::{PipelineConfig, DEFAULT_FRAME_RATE, DEFAULT_MAX_TEXT_LEN, DEFAULT_SAMPLE_RATE};
pub use error::{AudioOperation, PipelineError, Result, ResultExt};
