//! Synthesis orchestrator: cache, backend dispatch, post-processing

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::config::PipelineConfig;
use crate::core::error::{PipelineError, Result};
use crate::phoneme::PhonemeExtractor;
use crate::speech::cache::{cache_key, CacheArtifact, CacheStats, WaveformCache};
use crate::speech::postprocess;
use crate::speech::registry::EngineRegistry;
use crate::speech::traits::{EngineSelection, SpeechAudio, SpeechEngine};
use crate::text::Language;

/// Drives one synthesis request through the full chain:
/// length gate, cache lookup, backend dispatch with fallback, resampling,
/// post-processing, phoneme extraction and cache write-back.
pub struct SpeechSynthesizer {
    config: Arc<PipelineConfig>,
    registry: Arc<EngineRegistry>,
    cache: Option<WaveformCache>,
    extractor: PhonemeExtractor,
}

impl SpeechSynthesizer {
    pub fn new(config: Arc<PipelineConfig>, registry: Arc<EngineRegistry>) -> Self {
        let cache = match &config.cache_dir {
            Some(dir) => match WaveformCache::open(dir) {
                Ok(cache) => Some(cache),
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "cache disabled, directory unusable");
                    None
                }
            },
            None => None,
        };
        Self {
            extractor: PhonemeExtractor::new(),
            config,
            registry,
            cache,
        }
    }

    /// Pick the requested backend, or the configured fallback when the
    /// requested id is not registered. The substitution is recorded in
    /// the returned selection, not raised as an error.
    fn select_engine(&self, requested_id: &str) -> Result<(Arc<dyn SpeechEngine>, EngineSelection)> {
        if let Some(engine) = self.registry.get(requested_id) {
            return Ok((engine, EngineSelection::direct(requested_id)));
        }
        let fallback_id = &self.config.fallback_engine;
        match self.registry.get(fallback_id) {
            Some(engine) => {
                warn!(
                    requested = requested_id,
                    used = %fallback_id,
                    "requested engine unavailable, substituting fallback"
                );
                Ok((engine, EngineSelection::substituted(requested_id, fallback_id)))
            }
            None => Err(PipelineError::Synthesis {
                engine_id: requested_id.to_string(),
                message: format!(
                    "engine not registered and fallback '{}' unavailable",
                    fallback_id
                ),
            }),
        }
    }

    pub async fn synthesize(
        &self,
        text: &str,
        language: Language,
        voice_style: &str,
        engine_id: &str,
    ) -> Result<SpeechAudio> {
        if text.chars().count() > self.config.max_text_len {
            return Err(PipelineError::Validation {
                message: format!(
                    "text is {} characters, limit is {}",
                    text.chars().count(),
                    self.config.max_text_len
                ),
                field: Some("text".to_string()),
            });
        }

        let (engine, selection) = self.select_engine(engine_id)?;
        let used_id = selection.used_id.clone();
        // Keyed on the engine that will actually run, so a fallback
        // result is never served later as the requested engine's output.
        let key = cache_key(text, language, voice_style, &used_id);

        if let Some(cache) = &self.cache {
            if let Some(artifact) = cache.load(&key) {
                return Ok(SpeechAudio {
                    samples: artifact.samples,
                    sample_rate: artifact.sample_rate,
                    duration: artifact.duration,
                    engine: selection,
                    cache_key: key,
                    phonemes: artifact.phonemes,
                    language,
                    voice_style: voice_style.to_string(),
                    post_processed: artifact.post_processed,
                    from_cache: true,
                });
            }
        }

        let raw = engine.synthesize(text, language, voice_style).await?;
        let samples =
            postprocess::resample_linear(&raw.samples, raw.sample_rate, self.config.sample_rate)?;

        let (samples, post_processed) = match postprocess::post_process(
            samples.clone(),
            self.config.sample_rate,
            self.config.silence_threshold,
            self.config.fade_ms,
        ) {
            Ok(processed) => (processed, true),
            Err(e) => {
                warn!(engine_id = %used_id, error = %e, "post-processing failed, keeping raw audio");
                (samples, false)
            }
        };

        let duration = samples.len() as f32 / self.config.sample_rate as f32;
        let phonemes = self.extractor.extract(&samples, self.config.sample_rate);

        info!(
            engine_id = %used_id,
            fallback = selection.fallback,
            duration,
            phoneme_count = phonemes.len(),
            "synthesized speech"
        );

        if let Some(cache) = &self.cache {
            cache.store(
                &key,
                &CacheArtifact {
                    samples: samples.clone(),
                    sample_rate: self.config.sample_rate,
                    duration,
                    phonemes: phonemes.clone(),
                    engine_id: used_id,
                    language,
                    voice_style: voice_style.to_string(),
                    post_processed,
                },
            );
        }

        Ok(SpeechAudio {
            samples,
            sample_rate: self.config.sample_rate,
            duration,
            engine: selection,
            cache_key: key,
            phonemes,
            language,
            voice_style: voice_style.to_string(),
            post_processed,
            from_cache: false,
        })
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|c| c.stats())
    }
}
