//! Top-level pipeline facade
//!
//! Wires the text analyzer, speech synthesizer and timeline mapper into a
//! single entry point: text in, narration audio plus animation timeline out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::config::PipelineConfig;
use crate::core::error::{PipelineError, Result};
use crate::speech::{
    EngineRegistry, EspeakEngine, FormantEngine, SpeechAudio, SpeechSynthesizer, FORMANT_ENGINE_ID,
};
use crate::text::{Language, ProcessedText, TextAnalyzer};
use crate::timeline::{Timeline, TimelineMapper};

/// Output frame geometry, consumed by the downstream renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    #[default]
    Wide16x9,
    Tall9x16,
    Square,
}

/// Output quality tier, consumed by the downstream renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Hd720,
    #[default]
    Hd1080,
    Uhd4k,
}

/// One render request
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub text: String,
    pub language_hint: Option<Language>,
    pub voice_style: String,
    pub engine_id: String,
    pub aspect_ratio: AspectRatio,
    pub quality: QualityTier,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_hint: None,
            voice_style: "default".to_string(),
            engine_id: FORMANT_ENGINE_ID.to_string(),
            aspect_ratio: AspectRatio::default(),
            quality: QualityTier::default(),
        }
    }

    pub fn with_language_hint(mut self, language: Language) -> Self {
        self.language_hint = Some(language);
        self
    }

    pub fn with_voice_style(mut self, style: impl Into<String>) -> Self {
        self.voice_style = style.into();
        self
    }

    pub fn with_engine(mut self, engine_id: impl Into<String>) -> Self {
        self.engine_id = engine_id.into();
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }
}

/// Everything a render run produces, handed to downstream collaborators
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub text: ProcessedText,
    pub audio: SpeechAudio,
    pub timeline: Timeline,
    pub aspect_ratio: AspectRatio,
    pub quality: QualityTier,
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    analyzer: TextAnalyzer,
    synthesizer: SpeechSynthesizer,
    mapper: TimelineMapper,
    engine_ids: Vec<String>,
}

impl Pipeline {
    /// Build a pipeline with the default backend set: the built-in
    /// formant engine, plus espeak-ng when the binary is present.
    pub fn new(config: PipelineConfig) -> Self {
        let mut registry = EngineRegistry::new();
        registry.register(Arc::new(FormantEngine::new(16_000)));
        if EspeakEngine::probe() {
            registry.register(Arc::new(EspeakEngine::new()));
        }
        Self::with_registry(config, registry)
    }

    /// Build a pipeline over an explicit backend registry
    pub fn with_registry(config: PipelineConfig, registry: EngineRegistry) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(registry);
        let engine_ids = registry.ids();
        info!(engines = ?engine_ids, "pipeline ready");
        Self {
            analyzer: TextAnalyzer::new(),
            synthesizer: SpeechSynthesizer::new(config.clone(), registry),
            mapper: TimelineMapper::new(config.clone()),
            config,
            engine_ids,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ids of the backends this pipeline can dispatch to
    pub fn engine_ids(&self) -> &[String] {
        &self.engine_ids
    }

    /// Run the full pipeline for one request
    pub async fn run(&self, request: &RenderRequest) -> Result<RenderOutput> {
        let processed = self.analyzer.analyze(&request.text, request.language_hint);
        if processed.is_empty() {
            return Err(PipelineError::Validation {
                message: "no speakable text after cleaning".to_string(),
                field: Some("text".to_string()),
            });
        }

        let audio = self
            .synthesizer
            .synthesize(
                &processed.cleaned_text,
                processed.language.language,
                &request.voice_style,
                &request.engine_id,
            )
            .await?;

        let timeline = self.mapper.build(
            &processed.gesture_cues,
            &audio.phonemes,
            processed.cleaned_text.chars().count(),
            audio.duration,
        )?;

        info!(
            language = %processed.language.language,
            engine = %audio.engine.used_id,
            duration = audio.duration,
            total_frames = timeline.total_frames,
            "render complete"
        );

        Ok(RenderOutput {
            text: processed,
            audio,
            timeline,
            aspect_ratio: request.aspect_ratio,
            quality: request.quality,
        })
    }
}
