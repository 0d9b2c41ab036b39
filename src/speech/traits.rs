//! Core traits and types for speech synthesis backends

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::phoneme::PhonemeEvent;
use crate::text::Language;

/// Raw backend output, at the backend's native sample rate
#[derive(Debug, Clone)]
pub struct RawAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl RawAudio {
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Backend information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfo {
    /// Unique engine identifier used for registry lookup and cache keys
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Engine description
    pub description: String,
    /// Sample rate the backend natively produces
    pub native_sample_rate: u32,
    /// Languages the backend can voice
    pub languages: Vec<Language>,
}

/// Core trait for all speech synthesis backends
///
/// Backends produce raw waveforms only; resampling, post-processing,
/// phoneme extraction and caching all happen uniformly in the synthesizer.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Get engine information
    fn info(&self) -> &EngineInfo;

    /// Synthesize speech from already-cleaned text
    async fn synthesize(&self, text: &str, language: Language, voice_style: &str)
        -> Result<RawAudio>;
}

/// Which backend actually produced a result
///
/// Backend substitution is recorded as data so callers can assert on it
/// instead of scraping logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSelection {
    pub requested_id: String,
    pub used_id: String,
    pub fallback: bool,
}

impl EngineSelection {
    pub fn direct(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            requested_id: id.clone(),
            used_id: id,
            fallback: false,
        }
    }

    pub fn substituted(requested: impl Into<String>, used: impl Into<String>) -> Self {
        Self {
            requested_id: requested.into(),
            used_id: used.into(),
            fallback: true,
        }
    }
}

/// Fully processed synthesis result
///
/// Owned by the pipeline run that created it; duration is always derived
/// from sample count, never from a backend estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub duration: f32,
    pub engine: EngineSelection,
    pub cache_key: String,
    pub phonemes: Vec<PhonemeEvent>,
    pub language: Language,
    pub voice_style: String,
    /// False when post-processing failed and the raw audio was kept
    pub post_processed: bool,
    /// True when this result was served from the waveform cache
    pub from_cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_audio_duration() {
        let audio = RawAudio {
            samples: vec![0.0; 16_000],
            sample_rate: 16_000,
        };
        assert!((audio.duration() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_duration() {
        let audio = RawAudio {
            samples: vec![0.0; 100],
            sample_rate: 0,
        };
        assert_eq!(audio.duration(), 0.0);
    }

    #[test]
    fn test_engine_selection() {
        let direct = EngineSelection::direct("formant");
        assert!(!direct.fallback);
        assert_eq!(direct.requested_id, direct.used_id);

        let sub = EngineSelection::substituted("espeak", "formant");
        assert!(sub.fallback);
        assert_eq!(sub.used_id, "formant");
    }
}
