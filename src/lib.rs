//! Vocamotion: text to narrated, lip-synced character animation
//!
//! The pipeline turns raw text into everything a downstream renderer
//! needs for a talking-character video:
//!
//! 1. **Text analysis** — cleaning, language detection, sentence/word
//!    segmentation and trigger-word scanning for emotion and gesture cues.
//! 2. **Speech synthesis** — pluggable backends behind a registry with a
//!    built-in fallback engine, waveform post-processing and a file-backed
//!    cache.
//! 3. **Phoneme extraction** — energy-based onset detection over the
//!    synthesized waveform, mapped to viseme classes.
//! 4. **Timeline mapping** — cues and phonemes become frame-indexed
//!    keyframe tracks addressed by fixed channel names.
//!
//! ```no_run
//! use vocamotion::{Pipeline, PipelineConfig, RenderRequest};
//!
//! # async fn demo() -> vocamotion::Result<()> {
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let output = pipeline
//!     .run(&RenderRequest::new("Hello! Look at this."))
//!     .await?;
//! println!("{} frames at {} fps", output.timeline.total_frames, output.timeline.frame_rate);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod phoneme;
pub mod pipeline;
pub mod speech;
pub mod text;
pub mod timeline;

pub use crate::core::config::PipelineConfig;
pub use crate::core::error::{PipelineError, Result};
pub use phoneme::{PhonemeEvent, PhonemeExtractor};
pub use pipeline::{AspectRatio, Pipeline, QualityTier, RenderOutput, RenderRequest};
pub use speech::{EngineRegistry, SpeechAudio, SpeechEngine, SpeechSynthesizer};
pub use text::{Language, ProcessedText, TextAnalyzer, TextCue};
pub use timeline::{Timeline, TimelineMapper};
