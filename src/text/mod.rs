//! Text analysis: cleaning, language detection, segmentation, cue scanning

pub mod analyzer;
pub mod cleaner;
pub mod cues;
pub mod language;

pub use analyzer::{ProcessedText, TextAnalyzer, TimingEstimate};
pub use cleaner::clean_text;
pub use cues::{CueKind, CueSubtype, EmotionKind, GestureKind, TextCue};
pub use language::{DetectionSource, Language, LanguageDetection};
