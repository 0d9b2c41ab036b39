//! Pipeline configuration
//!
//! A single immutable configuration object constructed once at startup and
//! passed by reference into each component. There is deliberately no global
//! settings singleton; every table or threshold a component needs comes in
//! through this struct.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default output sample rate (44.1 kHz mono)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default animation frame rate
pub const DEFAULT_FRAME_RATE: u32 = 24;

/// Maximum accepted input text length in characters
pub const DEFAULT_MAX_TEXT_LEN: usize = 10_000;

/// Pipeline-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target sample rate for all synthesized audio
    pub sample_rate: u32,
    /// Animation frames per second
    pub frame_rate: u32,
    /// Requests with longer text are rejected before synthesis
    pub max_text_len: usize,
    /// Engine used when the requested backend is not registered
    pub fallback_engine: String,
    /// Waveform cache directory; `None` disables caching
    pub cache_dir: Option<PathBuf>,
    /// Relative-energy threshold for silence trimming (fraction of peak)
    pub silence_threshold: f32,
    /// Fade-in/fade-out length in milliseconds
    pub fade_ms: u32,
    /// Breathing cycle period for the idle track, in seconds
    pub breathing_period_secs: f32,
    /// Peak spine-scale displacement of the breathing cycle
    pub breathing_amplitude: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_rate: DEFAULT_FRAME_RATE,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            fallback_engine: "formant".to_string(),
            cache_dir: None,
            silence_threshold: 0.1,
            fade_ms: 100,
            breathing_period_secs: 4.0,
            breathing_amplitude: 0.05,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the waveform cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the target sample rate
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set the animation frame rate
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Set the maximum accepted text length
    pub fn with_max_text_len(mut self, len: usize) -> Self {
        self.max_text_len = len;
        self
    }
}
